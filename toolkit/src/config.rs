//! On-disk badge description and the pattern-to-bitmap parser that
//! stands in for a text renderer.

use anyhow::{Result, bail, ensure};
use ledbadge::{BANK_COUNT, Brightness, MATRIX_ROWS, Mode, Speed};
use serde::Deserialize;

/// A full badge upload as described in a JSON file.
#[derive(Debug, Deserialize)]
pub struct BadgeConfig {
    #[serde(default)]
    pub brightness: Brightness,
    pub banks: Vec<BankConfig>,
}

/// One bank entry: display settings plus the pixel pattern.
#[derive(Debug, Deserialize)]
pub struct BankConfig {
    /// Bank slot, `0..8`.
    pub bank: usize,
    #[serde(default)]
    pub blinking: bool,
    #[serde(default)]
    pub animated_border: bool,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub speed: Speed,
    /// Up to 11 rows of `#` (on) and `.` or space (off). Short rows and
    /// missing rows read as blank; the widest row sets the bitmap width.
    pub pattern: Vec<String>,
}

impl BankConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.bank < BANK_COUNT,
            "bank index {} out of range, the badge has {} banks",
            self.bank,
            BANK_COUNT
        );
        Ok(())
    }
}

/// Pixel matrix parsed from a pattern block. Acts as the lit-pixel
/// source handed to the encoder.
#[derive(Debug, Clone)]
pub struct Bitmap {
    width: usize,
    rows: Vec<Vec<bool>>,
}

impl Bitmap {
    pub fn parse(pattern: &[String]) -> Result<Self> {
        ensure!(
            pattern.len() <= MATRIX_ROWS,
            "pattern has {} rows but the matrix is {} pixels tall",
            pattern.len(),
            MATRIX_ROWS
        );

        let width = pattern.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut rows = vec![vec![false; width]; MATRIX_ROWS];
        for (y, line) in pattern.iter().enumerate() {
            for (x, c) in line.chars().enumerate() {
                rows[y][x] = match c {
                    '#' => true,
                    '.' | ' ' => false,
                    other => bail!("unexpected pattern character {other:?} at row {y}, column {x}"),
                };
            }
        }

        Ok(Self { width, rows })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn lit(&self, x: usize, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.get(x).copied().unwrap_or(false))
    }
}
