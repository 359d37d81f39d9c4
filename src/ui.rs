pub struct UiState {
    // Text that becomes the label of the next marker
    pub label_input: String,

    // Last notice for the operator, shown in the status bar
    pub status: Option<String>,

    pub show_marker_list: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            label_input: String::new(),
            status: None,
            show_marker_list: true,
        }
    }
}
