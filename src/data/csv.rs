use super::*;
use crate::*;
use std::collections::HashMap;

impl Dataset {
    /// Parse comma-separated text with a header row.
    ///
    /// Every column but the last is a numeric feature. The last column is
    /// the class, mapped to dense labels in order of first appearance.
    pub fn parse(text: &str) -> Result<Self, SelectionError> {
        let mut lines = text
            .lines()
            .map(str::trim)
            .enumerate()
            .filter(|(_, l)| !l.is_empty());
        let width = lines
            .next()
            .map(|(_, header)| header.split(',').count())
            .ok_or_else(|| SelectionError::InvalidDataset("empty input".into()))?;
        if width < 2 {
            return Err(SelectionError::InvalidDataset(
                "need at least one feature column and one label column".into(),
            ));
        }
        let mut classes = HashMap::<String, Label>::new();
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for (line, record) in lines {
            let fields = record.split(',').map(str::trim).collect::<Vec<_>>();
            if fields.len() != width {
                return Err(SelectionError::InvalidDataset(format!(
                    "line {} has {} fields, expected {}",
                    line + 1,
                    fields.len(),
                    width
                )));
            }
            let (class, values) = fields.split_last().expect("width >= 2");
            let row = values
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| SelectionError::InvalidDataset(format!("line {}: {}", line + 1, e)))?;
            let next = classes.len();
            labels.push(*classes.entry(class.to_string()).or_insert(next));
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(SelectionError::InvalidDataset("no samples".into()));
        }
        Self::new(rows, labels)
    }

    /// Read and parse a CSV file.
    pub fn load(path: &std::path::Path) -> Result<Self, SelectionError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SelectionError::InvalidDataset(format!("{}: {}", path.display(), e)))?;
        let data = Self::parse(&text)?;
        log::info!(
            "loaded {} samples × {} features from {}",
            data.len(),
            data.width(),
            path.display()
        );
        Ok(data)
    }
}
