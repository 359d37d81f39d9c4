use std::io::{self, BufRead, Write};

use crate::hit::{find_hit, PICK_RADIUS};
use crate::marker::{Marker, MarkerColor};

/// Ordered marker list. Insertion order is creation order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MarkerStore {
    markers: Vec<Marker>,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a marker and returns its index.
    pub fn add(&mut self, x: f64, y: f64, label: impl Into<String>, color: MarkerColor) -> usize {
        self.markers.push(Marker::new(x, y, label, color));
        self.markers.len() - 1
    }

    /// Removes the first marker within the pick radius of `(x, y)`.
    ///
    /// Finding nothing is a normal outcome and returns `None`.
    pub fn remove_nearest(&mut self, x: f64, y: f64) -> Option<Marker> {
        let index = find_hit(&self.markers, x, y, PICK_RADIUS)?;
        Some(self.markers.remove(index))
    }

    /// Replaces the current markers with those parsed from `reader`.
    ///
    /// Malformed lines, including ones that are not UTF-8, are skipped. Only
    /// an I/O error aborts the load, and the store keeps whatever had been
    /// parsed up to that point.
    pub fn load_from<R: BufRead>(&mut self, reader: R) -> io::Result<usize> {
        self.markers.clear();
        let mut skipped = 0usize;
        for (number, bytes) in reader.split(b'\n').enumerate() {
            let bytes = bytes?;
            let marker = match std::str::from_utf8(&bytes) {
                Ok(line) => Marker::parse_line(line),
                Err(err) => {
                    log::debug!("Skipping marker line {}: {err}", number + 1);
                    None
                }
            };
            match marker {
                Some(marker) => self.markers.push(marker),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            log::debug!("Skipped {skipped} malformed marker line(s)");
        }
        Ok(self.markers.len())
    }

    pub fn save_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for marker in &self.markers {
            writeln!(writer, "{}", marker.to_line())?;
        }
        writer.flush()
    }

    #[cfg(test)]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
