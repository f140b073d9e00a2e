//! Category display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    icon: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Color")]
    color: String,
}

pub fn format_category_table(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'kuberium init' to create the default categories."
            .to_string();
    }

    let rows = categories.iter().map(|c| CategoryRow {
        id: c.id.short(),
        icon: c.icon.clone(),
        name: c.name.clone(),
        color: c.color.clone(),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_categories;

    #[test]
    fn test_lists_every_category() {
        let categories = default_categories();
        let output = format_category_table(&categories);
        for category in &categories {
            assert!(output.contains(&category.name));
        }
    }

    #[test]
    fn test_empty_hint() {
        assert!(format_category_table(&[]).contains("kuberium init"));
    }
}
