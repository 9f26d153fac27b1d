use super::export::{flatten_all, DATE_FORMAT};
use crate::model::ProfileRecord;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Extensions")]
    extensions: usize,
    #[tabled(rename = "Built-in")]
    built_in: usize,
    #[tabled(rename = "Third-party")]
    third_party: usize,
    #[tabled(rename = "Last Modified")]
    last_modified: String,
    #[tabled(rename = "Path")]
    path: String,
}

#[derive(Tabled)]
struct ExtensionRow {
    #[tabled(rename = "Profile")]
    profile: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Publisher")]
    publisher: String,
}

pub fn print_profiles_table(profiles: &[ProfileRecord]) {
    if profiles.is_empty() {
        println!("No VSCode profiles found.");
        return;
    }

    let rows: Vec<ProfileRow> = profiles
        .iter()
        .map(|p| ProfileRow {
            name: if p.is_default {
                format!("{} (default)", p.name)
            } else {
                p.name.clone()
            },
            extensions: p.extensions.len(),
            built_in: p.built_in_count(),
            third_party: p.third_party_count(),
            last_modified: p
                .last_modified
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| "-".to_string()),
            path: truncate(&p.path.display().to_string(), 60),
        })
        .collect();

    println!("Found {} profile(s):", rows.len());
    println!();
    println!("{}", Table::new(rows).with(Style::rounded()));
}

pub fn print_extensions_table(profiles: &[ProfileRecord]) {
    let records = flatten_all(profiles);
    if records.is_empty() {
        println!("No extensions found.");
        return;
    }

    let rows: Vec<ExtensionRow> = records
        .iter()
        .map(|e| ExtensionRow {
            profile: e.profile_name.clone().unwrap_or_default(),
            id: truncate(&e.id, 50),
            name: truncate(&e.display_name, 40),
            version: e.version.clone(),
            publisher: truncate(&e.publisher, 30),
        })
        .collect();

    println!("Found {} extension(s):", rows.len());
    println!();
    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
