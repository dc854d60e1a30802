//! Category display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Colour")]
    color: String,
    #[tabled(rename = "VAT")]
    vat: &'static str,
    #[tabled(rename = "Transactions")]
    usage: usize,
}

/// Format categories with the number of transactions using each
pub fn format_category_table(categories: &[(&Category, usize)]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nCreate one with 'vatbook category add <NAME> --type expense'.\n"
            .to_string();
    }

    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|(category, usage)| CategoryRow {
            id: category.id.to_string(),
            name: category.name.clone(),
            kind: category.kind.to_string(),
            color: category.display_color().to_string(),
            vat: if category.vat_applicable { "yes" } else { "no" },
            usage: *usage,
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    format!("{}\n", table)
}

/// Format category details for display
pub fn format_category_details(category: &Category, usage: usize) -> String {
    let mut output = String::new();
    output.push_str(&format!("Category:     {}\n", category.name));
    output.push_str(&format!("ID:           {}\n", category.id));
    output.push_str(&format!("Type:         {}\n", category.kind));
    output.push_str(&format!("Colour:       {}\n", category.display_color()));
    output.push_str(&format!(
        "VAT:          {}\n",
        if category.vat_applicable {
            "applicable"
        } else {
            "not applicable"
        }
    ));
    output.push_str(&format!("Transactions: {}\n", usage));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryKind;

    #[test]
    fn test_category_table() {
        let rent = Category::new("Rent", CategoryKind::Expense).with_color("#EF4444");
        let insurance = Category::new("Insurance", CategoryKind::Expense).with_vat_applicable(false);

        let output = format_category_table(&[(&rent, 3), (&insurance, 0)]);
        assert!(output.contains("Rent"));
        assert!(output.contains("#EF4444"));
        assert!(output.contains("#9CA3AF"));
        assert!(output.contains("no"));
    }

    #[test]
    fn test_empty_category_table() {
        assert!(format_category_table(&[]).starts_with("No categories found."));
    }

    #[test]
    fn test_details() {
        let category = Category::new("Insurance", CategoryKind::Both).with_vat_applicable(false);
        let output = format_category_details(&category, 2);
        assert!(output.contains("Type:         both"));
        assert!(output.contains("not applicable"));
        assert!(output.contains("Transactions: 2"));
    }
}
