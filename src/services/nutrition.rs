use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::errors::EatError;
use crate::models::NutritionRecord;

const COL_FOOD: &str = "Dish Name";
const COL_CALORIES: &str = "Calories (kcal)";
const COL_PROTEIN: &str = "Protein (g)";
const COL_FAT: &str = "Fats (g)";
const COL_CARBS: &str = "Carbohydrates (g)";

/// Read-only dish table, kept in CSV row order.
#[derive(Debug, Clone, Default)]
pub struct NutritionTable {
    records: Vec<NutritionRecord>,
}

impl NutritionTable {
    #[cfg(test)]
    pub fn new(records: Vec<NutritionRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening nutrition CSV {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("loading nutrition CSV {}", path.display()))
    }

    /// Parse the CSV. Rows with an empty name or a missing / non-numeric
    /// macro are skipped; a missing column fails the whole load.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers().context("reading CSV headers")?.clone();
        let column = |name: &'static str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| EatError::MissingColumn(name).into())
        };
        let food_idx = column(COL_FOOD)?;
        let calories_idx = column(COL_CALORIES)?;
        let protein_idx = column(COL_PROTEIN)?;
        let fat_idx = column(COL_FAT)?;
        let carbs_idx = column(COL_CARBS)?;

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (row_no, result) in reader.records().enumerate() {
            let row = result.with_context(|| format!("CSV row {}", row_no))?;

            let name = row.get(food_idx).unwrap_or("").to_string();
            let macros = (
                parse_number(row.get(calories_idx)),
                parse_number(row.get(protein_idx)),
                parse_number(row.get(fat_idx)),
                parse_number(row.get(carbs_idx)),
            );

            match macros {
                (Some(calories), Some(protein_g), Some(fat_g), Some(carbs_g)) if !name.is_empty() => {
                    records.push(NutritionRecord {
                        name,
                        calories,
                        protein_g,
                        fat_g,
                        carbs_g,
                    });
                }
                _ => {
                    log::debug!("Skipping nutrition row {} ({:?})", row_no, name);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            log::warn!("⚠️ Dropped {} incomplete nutrition rows", skipped);
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[NutritionRecord] {
        &self.records
    }

    /// First row whose name equals `name`, ignoring case and surrounding
    /// whitespace.
    pub fn exact(&self, name: &str) -> Option<&NutritionRecord> {
        let query = name.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.records.iter().find(|r| r.name.to_lowercase() == query)
    }

    /// Case-insensitive exact name match, then the first row whose name
    /// contains the query. Blank queries never match.
    pub fn lookup(&self, name: &str) -> Option<&NutritionRecord> {
        let query = name.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        self.exact(&query)
            .or_else(|| self.records.iter().find(|r| r.name.to_lowercase().contains(&query)))
    }
}

fn parse_number(cell: Option<&str>) -> Option<f64> {
    let value: f64 = cell?.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Dish Name,Calories (kcal),Protein (g),Fats (g),Carbohydrates (g),Fibre (g)
Idli,58,2.0,0.4,12.0,0.8
Masala Dosa,168,3.9,6.2,24.5,1.1
Plain Dosa,133,3.1,3.7,21.6,0.9
Idli,99,9,9,9,9
Broken Row,,1,1,1,0
Weird Macro,120,n/a,1,1,0
,100,1,1,1,0
Not A Number,nan,1,1,1,0
Gulab Jamun,175,2.8,7.9,23.7,0.3
";

    fn sample_table() -> NutritionTable {
        NutritionTable::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_drops_incomplete_rows() {
        let table = sample_table();
        let names: Vec<&str> = table.records().iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, vec!["Idli", "Masala Dosa", "Plain Dosa", "Idli", "Gulab Jamun"]);
    }

    #[test]
    fn test_missing_column_fails() {
        let err = NutritionTable::from_reader("Dish Name,Calories (kcal)\nIdli,58\n".as_bytes()).unwrap_err();
        let root = err.downcast_ref::<EatError>();
        assert!(matches!(root, Some(EatError::MissingColumn("Protein (g)"))));
    }

    #[test]
    fn test_exact_lookup_is_case_insensitive_and_first_wins() {
        let table = sample_table();
        let record = table.lookup("IDLI").unwrap();

        assert_eq!(record.name, "Idli");
        assert_eq!(record.calories, 58.0);
    }

    #[test]
    fn test_exact_match_beats_earlier_substring() {
        let table = sample_table();
        assert_eq!(table.lookup("plain dosa").unwrap().name, "Plain Dosa");
    }

    #[test]
    fn test_exact_never_falls_back_to_substring() {
        let table = sample_table();
        assert_eq!(table.exact(" masala dosa ").unwrap().calories, 168.0);
        assert!(table.exact("dosa").is_none());
        assert!(table.exact("").is_none());
    }

    #[test]
    fn test_substring_lookup_returns_first_in_table_order() {
        let table = sample_table();
        assert_eq!(table.lookup("dosa").unwrap().name, "Masala Dosa");
        assert_eq!(table.lookup(" jamun ").unwrap().name, "Gulab Jamun");
    }

    #[test]
    fn test_missing_food_is_not_found() {
        let table = sample_table();
        assert!(table.lookup("pizza").is_none());
        assert!(table.lookup("").is_none());
        assert!(table.lookup("   ").is_none());
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let table = sample_table();
        let first = table.lookup("masala").cloned();
        let second = table.lookup("masala").cloned();

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("food.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let table = NutritionTable::load(&path).unwrap();
        assert_eq!(table.len(), 5);

        assert!(NutritionTable::load(&dir.path().join("missing.csv")).is_err());
    }
}
