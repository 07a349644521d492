//! Read-only vocabulary catalog loaded from CSV files.
//!
//! Each `<set-id>.csv` file holds one set. Optional `# title:` and
//! `# description:` lines come first, then an optional header row, then one
//! word per row:
//!
//! ```text
//! id,term,pronunciation,definition,example,difficulty,category
//! ```

use crate::logger;
use crate::models::{VocabularySet, Word};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FIELD_COUNT: usize = 7;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Vocabulary set not found: {0}")]
    SetNotFound(String),
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sets: Vec<VocabularySet>,
}

impl Catalog {
    pub fn new(sets: Vec<VocabularySet>) -> Self {
        Self { sets }
    }

    /// Loads every `.csv` file in `dir`, sorted by file name. A missing
    /// directory yields an empty catalog.
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogError> {
        let mut sets = Vec::new();
        for path in get_vocabulary_files(dir) {
            sets.push(load_vocabulary_set(&path)?);
        }
        logger::log(&format!(
            "Loaded {} vocabulary sets from {}",
            sets.len(),
            dir.display()
        ));
        Ok(Self { sets })
    }

    pub fn sets(&self) -> &[VocabularySet] {
        &self.sets
    }

    pub fn get_set(&self, id: &str) -> Result<&VocabularySet, CatalogError> {
        self.sets
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CatalogError::SetNotFound(id.to_string()))
    }

    pub fn all_words(&self) -> Vec<&Word> {
        self.sets.iter().flat_map(|s| s.words.iter()).collect()
    }
}

pub fn get_vocabulary_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if dir.is_dir()
        && let Ok(entries) = fs::read_dir(dir)
    {
        for entry in entries.flatten() {
            if let Some(ext) = entry.path().extension()
                && ext == "csv"
            {
                files.push(entry.path());
            }
        }
    }

    files.sort();
    files
}

pub fn load_vocabulary_set(path: &Path) -> Result<VocabularySet, CatalogError> {
    let content = fs::read_to_string(path)?;
    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(parse_vocabulary_set(&id, &content))
}

pub fn parse_vocabulary_set(id: &str, content: &str) -> VocabularySet {
    let mut title = None;
    let mut description = String::new();
    let mut words = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(meta) = trimmed.strip_prefix('#') {
            if let Some((key, value)) = meta.split_once(':') {
                match key.trim() {
                    "title" => title = Some(value.trim().to_string()),
                    "description" => description = value.trim().to_string(),
                    _ => {}
                }
            }
            continue;
        }

        let fields = parse_csv_line(trimmed);
        if fields.first().map(|f| f.eq_ignore_ascii_case("id")) == Some(true) {
            continue;
        }
        match parse_word(&fields) {
            Some(word) => words.push(word),
            None => logger::log(&format!(
                "Skipping malformed row {} in vocabulary set '{}'",
                line_no + 1,
                id
            )),
        }
    }

    VocabularySet {
        id: id.to_string(),
        title: title.unwrap_or_else(|| id.to_string()),
        description,
        words,
    }
}

fn parse_word(fields: &[String]) -> Option<Word> {
    if fields.len() != FIELD_COUNT {
        return None;
    }
    let difficulty: u8 = fields[5].parse().ok()?;
    if !(1..=3).contains(&difficulty) {
        return None;
    }
    if fields[0].is_empty() || fields[1].is_empty() || fields[3].is_empty() {
        return None;
    }
    Some(Word {
        id: fields[0].clone(),
        term: fields[1].clone(),
        pronunciation: fields[2].clone(),
        definition: fields[3].clone(),
        example: fields[4].clone(),
        difficulty,
        category: fields[6].clone(),
    })
}

/// Splits one CSV line into trimmed fields. Quoted fields may contain commas;
/// `""` inside quotes is an escaped quote.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut chars = line.chars().peekable();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => {
                in_quotes = true;
            }
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => {
                current.push(c);
            }
        }
    }

    fields.push(current.trim().to_string());
    fields
}
