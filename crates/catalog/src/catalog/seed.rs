use askdb_core::{record, Record};
use indexmap::IndexMap;

pub(super) fn tables() -> IndexMap<String, Vec<Record>> {
    let mut tables = IndexMap::new();
    tables.insert("sales".to_string(), sales());
    tables.insert("customers".to_string(), customers());
    tables
}

fn sales() -> Vec<Record> {
    vec![
        record! { "id" => 1, "product" => "Laptop", "amount" => 1200, "date" => "2023-01-15", "region" => "North" },
        record! { "id" => 2, "product" => "Phone", "amount" => 800, "date" => "2023-01-16", "region" => "South" },
        record! { "id" => 3, "product" => "Tablet", "amount" => 450, "date" => "2023-01-17", "region" => "East" },
    ]
}

fn customers() -> Vec<Record> {
    vec![
        record! { "id" => 1, "name" => "John Doe", "email" => "john@example.com", "join_date" => "2022-12-01" },
        record! { "id" => 2, "name" => "Jane Smith", "email" => "jane@example.com", "join_date" => "2023-01-05" },
    ]
}
