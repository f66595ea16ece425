use crate::error::GtResult;
use crate::input::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One key slot: the character it produces and its center position in
/// keyboard pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KeySlot {
    pub ch: char,
    pub x: f32,
    pub y: f32,
}

/// Physical geometry of the letter area, the collaborator the pipeline and
/// the geometric backend share. Coordinates are pixels with the origin at
/// the top-left of the letter block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardLayout {
    pub keys: Vec<KeySlot>,
    pub key_width: f32,
    pub key_height: f32,
    pub width: f32,
    pub height: f32,
}

const QWERTY_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

// Row offsets in key-width units, matching the usual touch-keyboard stagger.
const ROW_OFFSETS: [f32; 3] = [0.0, 0.5, 1.5];

impl KeyboardLayout {
    /// Standard staggered QWERTY letter block filling `width` x `height`.
    pub fn qwerty(width: f32, height: f32) -> Self {
        let key_width = width / 10.0;
        let key_height = height / 3.0;

        let mut keys = Vec::with_capacity(26);
        for (row, (letters, offset)) in QWERTY_ROWS.iter().zip(ROW_OFFSETS).enumerate() {
            for (col, ch) in letters.chars().enumerate() {
                keys.push(KeySlot {
                    ch,
                    x: (offset + col as f32 + 0.5) * key_width,
                    y: (row as f32 + 0.5) * key_height,
                });
            }
        }

        Self {
            keys,
            key_width,
            key_height,
            width,
            height,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GtResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn key_center(&self, ch: char) -> Option<Point> {
        let lower = ch.to_ascii_lowercase();
        self.keys
            .iter()
            .find(|k| k.ch == lower)
            .map(|k| Point::new(k.x, k.y))
    }

    /// Key whose bounding box contains `point`, if any.
    pub fn key_at(&self, point: Point) -> Option<char> {
        self.keys
            .iter()
            .find(|k| {
                (point.x - k.x).abs() <= self.key_width / 2.0
                    && (point.y - k.y).abs() <= self.key_height / 2.0
            })
            .map(|k| k.ch)
    }

    /// Closest key center to `point`, regardless of bounding boxes.
    pub fn nearest_key(&self, point: Point) -> Option<char> {
        self.keys
            .iter()
            .min_by(|a, b| {
                let da = point.distance(&Point::new(a.x, a.y));
                let db = point.distance(&Point::new(b.x, b.y));
                da.total_cmp(&db)
            })
            .map(|k| k.ch)
    }

    /// Ideal trajectory through a word's key centers. Characters without a
    /// key (apostrophes, accents) are skipped.
    pub fn word_path(&self, word: &str) -> Vec<Point> {
        word.chars().filter_map(|c| self.key_center(c)).collect()
    }
}
