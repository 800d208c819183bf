//! Puzzle inputs stored on disk

use crate::error::InputError;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Directory of puzzle inputs
///
/// Directory structure: `{input_dir}/day{day:02}/input.txt`
#[derive(Debug, Clone)]
pub struct InputStore {
    input_dir: PathBuf,
}

impl InputStore {
    pub fn new(input_dir: PathBuf) -> Self {
        Self { input_dir }
    }

    /// Get the input path for a specific day
    pub fn input_path(&self, day: u8) -> PathBuf {
        self.input_dir.join(format!("day{:02}", day)).join("input.txt")
    }

    /// Check if an input file exists for the day
    pub fn contains(&self, day: u8) -> bool {
        self.input_path(day).is_file()
    }

    /// Read the whole input for a day with line endings normalised to `\n`
    pub fn get(&self, day: u8) -> Result<String, InputError> {
        let path = self.input_path(day);
        match fs::read_to_string(&path) {
            Ok(content) if content.contains('\r') => Ok(content.replace("\r\n", "\n")),
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(InputError::Missing { day, path }),
            Err(source) => Err(InputError::Read { day, path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(day: u8, content: &str) -> (TempDir, InputStore) {
        let temp = TempDir::new().unwrap();
        let store = InputStore::new(temp.path().to_path_buf());
        let path = store.input_path(day);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        (temp, store)
    }

    #[test]
    fn test_input_path_format() {
        let store = InputStore::new(PathBuf::from("inputs"));
        assert_eq!(store.input_path(9), PathBuf::from("inputs/day09/input.txt"));
        assert_eq!(store.input_path(25), PathBuf::from("inputs/day25/input.txt"));
    }

    #[test]
    fn test_read_input() {
        let (_temp, store) = store_with(1, "test input\nline 2\n");
        assert!(store.contains(1));
        assert_eq!(store.get(1).unwrap(), "test input\nline 2\n");
    }

    #[test]
    fn test_crlf_normalised() {
        let (_temp, store) = store_with(3, "a\r\nb\r\n\r\nc\r\n");
        assert_eq!(store.get(3).unwrap(), "a\nb\n\nc\n");
    }

    #[test]
    fn test_missing_input() {
        let (_temp, store) = store_with(1, "x");
        assert!(!store.contains(2));
        assert!(matches!(store.get(2), Err(InputError::Missing { day: 2, .. })));
    }
}
