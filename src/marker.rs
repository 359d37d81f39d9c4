use std::fmt;
use std::str::FromStr;

use egui::Color32;

/// Colour tag of a marker. Only two are offered, toggled from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerColor {
    #[default]
    Red,
    Blue,
}

impl MarkerColor {
    pub fn toggled(self) -> Self {
        match self {
            MarkerColor::Red => MarkerColor::Blue,
            MarkerColor::Blue => MarkerColor::Red,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MarkerColor::Red => "red",
            MarkerColor::Blue => "blue",
        }
    }

    pub fn to_color32(self) -> Color32 {
        match self {
            MarkerColor::Red => Color32::RED,
            MarkerColor::Blue => Color32::BLUE,
        }
    }
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown marker color `{}`", self.0)
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for MarkerColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(MarkerColor::Red),
            "blue" => Ok(MarkerColor::Blue),
            other => Err(UnknownColor(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64, // image-space, independent of zoom
    pub y: f64,
    pub label: String,
    pub color: MarkerColor,
}

impl Marker {
    pub fn new(x: f64, y: f64, label: impl Into<String>, color: MarkerColor) -> Self {
        Self {
            x,
            y,
            label: label.into(),
            color,
        }
    }

    /// Parses one `x,y,label[,color]` line.
    ///
    /// Returns `None` for lines with fewer than three fields, for the legacy
    /// `None` coordinate sentinel and for coordinates that are not finite numbers.
    pub fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.trim().split(',').collect();
        if fields.len() < 3 {
            return None;
        }

        let (x, y, label) = (fields[0], fields[1], fields[2]);
        if x == "None" || y == "None" {
            return None;
        }

        let (x, y) = match (x.parse::<f64>(), y.parse::<f64>()) {
            (Ok(x), Ok(y)) if x.is_finite() && y.is_finite() => (x, y),
            _ => {
                log::debug!("Skipping marker line with bad coordinates: {line:?}");
                return None;
            }
        };

        let color = match fields.get(3) {
            Some(name) => name.parse().unwrap_or_else(|err| {
                log::debug!("{err}, using {}", MarkerColor::default());
                MarkerColor::default()
            }),
            None => MarkerColor::default(),
        };

        Some(Self::new(x, y, label, color))
    }

    pub fn to_line(&self) -> String {
        format!("{},{},{},{}", self.x, self.y, self.label, self.color)
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        ((x - self.x).powi(2) + (y - self.y).powi(2)).sqrt()
    }
}
