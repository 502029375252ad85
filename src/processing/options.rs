//! Distinct values for populating filter controls.

use std::collections::BTreeSet;

use crate::types::Row;

/// Sorted distinct non-empty values per filterable column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub phenotypes: Vec<String>,
    pub tissues: Vec<String>,
    pub types: Vec<String>,
    pub methods: Vec<String>,
}

impl FilterOptions {
    /// Collect options from every row.
    pub fn from_rows(rows: &[Row]) -> Self {
        Self {
            phenotypes: distinct(rows, |r| &r.phenotype),
            tissues: distinct(rows, |r| &r.tissue),
            types: distinct(rows, |r| &r.r#type),
            methods: distinct(rows, |r| &r.method),
        }
    }
}

fn distinct<F>(rows: &[Row], field: F) -> Vec<String>
where
    F: Fn(&Row) -> &String,
{
    rows.iter()
        .map(field)
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::FilterOptions;
    use crate::types::Row;

    fn row(phenotype: &str, tissue: &str) -> Row {
        Row {
            phenotype: phenotype.to_string(),
            tissue: tissue.to_string(),
            r#type: "Survival".to_string(),
            method: String::new(),
            n: None,
            cpg: String::new(),
            location: String::new(),
            gene: String::new(),
            beta: f64::NAN,
            p: f64::NAN,
            source: "A.csv".to_string(),
        }
    }

    #[test]
    fn options_are_sorted_distinct_and_non_empty() {
        let rows = vec![row("BMI", "Blood"), row("AD", ""), row("BMI", "Brain")];
        let opts = FilterOptions::from_rows(&rows);
        assert_eq!(opts.phenotypes, vec!["AD", "BMI"]);
        assert_eq!(opts.tissues, vec!["Blood", "Brain"]);
        assert_eq!(opts.types, vec!["Survival"]);
        assert!(opts.methods.is_empty());
    }
}
