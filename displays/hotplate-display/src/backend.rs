//! Display backend trait
//!
//! Defines the interface for character displays.

use crate::screen::{Screen, SCREEN_COLS};

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Pin or bus error while talking to the display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
}

/// Display backend trait
///
/// Provides a hardware-agnostic interface for character displays.
pub trait DisplayBackend {
    /// Clear the entire display
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text at the specified row and column
    ///
    /// - `row`: Row number (0-based)
    /// - `col`: Column number in characters (0-based)
    /// - `text`: ASCII text to display
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;

    /// Set the contrast level (0 = lowest)
    fn set_contrast(&mut self, level: u8) -> Result<(), DisplayError>;

    /// Flush buffered content to the display
    ///
    /// Displays without an internal buffer may do nothing here.
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Get the display dimensions
    ///
    /// Returns (columns, rows) in character units
    fn dimensions(&self) -> (u8, u8);
}

/// Write a dirty screen to a backend
///
/// Every row is padded with spaces so stale characters are overwritten.
/// Returns `Ok(false)` when nothing needed drawing.
pub fn draw_screen<B: DisplayBackend>(
    backend: &mut B,
    screen: &mut Screen,
) -> Result<bool, DisplayError> {
    if !screen.is_dirty() {
        return Ok(false);
    }

    let (_, rows) = backend.dimensions();
    let mut padded = [b' '; SCREEN_COLS];

    for (row, line) in screen.lines().enumerate().take(rows as usize) {
        padded.fill(b' ');
        let bytes = line.as_bytes();
        let len = bytes.len().min(SCREEN_COLS);
        padded[..len].copy_from_slice(&bytes[..len]);
        // Screen lines only hold ASCII
        let text = core::str::from_utf8(&padded).map_err(|_| DisplayError::InvalidCoordinates)?;
        backend.draw_text(row as u8, 0, text)?;
    }

    backend.flush()?;
    screen.mark_clean();
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::SCREEN_ROWS;

    #[derive(Default)]
    struct MockBackend {
        rows: [[u8; SCREEN_COLS]; SCREEN_ROWS],
        writes: usize,
        flushes: usize,
    }

    impl DisplayBackend for MockBackend {
        fn clear(&mut self) -> Result<(), DisplayError> {
            self.rows = [[b' '; SCREEN_COLS]; SCREEN_ROWS];
            Ok(())
        }

        fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
            let row = self
                .rows
                .get_mut(row as usize)
                .ok_or(DisplayError::InvalidCoordinates)?;
            for (i, b) in text.bytes().enumerate() {
                if let Some(cell) = row.get_mut(col as usize + i) {
                    *cell = b;
                }
            }
            self.writes += 1;
            Ok(())
        }

        fn set_contrast(&mut self, _level: u8) -> Result<(), DisplayError> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), DisplayError> {
            self.flushes += 1;
            Ok(())
        }

        fn dimensions(&self) -> (u8, u8) {
            (SCREEN_COLS as u8, SCREEN_ROWS as u8)
        }
    }

    #[test]
    fn test_draw_pads_rows() {
        let mut backend = MockBackend::default();
        backend.rows[0] = [b'x'; SCREEN_COLS];

        let mut screen = Screen::new();
        screen.set_line(0, "Soak");
        assert_eq!(draw_screen(&mut backend, &mut screen), Ok(true));

        assert_eq!(&backend.rows[0], b"Soak            ");
        assert_eq!(backend.writes, 2);
        assert_eq!(backend.flushes, 1);
        assert!(!screen.is_dirty());
    }

    #[test]
    fn test_clean_screen_not_redrawn() {
        let mut backend = MockBackend::default();
        let mut screen = Screen::new();
        draw_screen(&mut backend, &mut screen).unwrap();
        assert_eq!(draw_screen(&mut backend, &mut screen), Ok(false));
        assert_eq!(backend.flushes, 1);
    }
}
