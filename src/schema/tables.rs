//! Export table definitions for every snapshot source

use super::types::*;

// =============================================================================
// Reference tables (no FK dependencies)
// =============================================================================

pub static ACTIVITIES: TableSchema = TableSchema {
    name: "activities",
    source_file: "BONSAI/bonsai_activity-names.json",
    columns: &[
        Column::required("code", ColumnType::Text),
        Column::new("description", ColumnType::Text),
        Column::new("flow_type", ColumnType::Text),
    ],
    foreign_keys: &[],
};

pub static LOCATIONS: TableSchema = TableSchema {
    name: "locations",
    source_file: "BONSAI/bonsai_locations.json",
    columns: &[
        Column::required("code", ColumnType::Text),
        Column::new("name", ColumnType::Text),
    ],
    foreign_keys: &[],
};

// =============================================================================
// Process-flow tables
// =============================================================================

pub static FOOTPRINTS: TableSchema = TableSchema {
    name: "footprints",
    source_file: "BONSAI/bonsai_footprints.json",
    columns: &[
        Column::required("flow_code", ColumnType::Text),
        Column::required("region_code", ColumnType::Text),
        Column::new("value", ColumnType::Real),
        Column::new("unit_reference", ColumnType::Text),
        Column::new("version", ColumnType::Text),
    ],
    foreign_keys: &[
        ForeignKey::code("flow_code", "activities"),
        ForeignKey::code("region_code", "locations"),
    ],
};

pub static RECIPES: TableSchema = TableSchema {
    name: "recipes",
    source_file: "BONSAI/bonsai_recipes.json",
    columns: &[
        Column::required("flow_reference", ColumnType::Text),
        Column::required("region_reference", ColumnType::Text),
        Column::required("flow_input", ColumnType::Text),
        Column::new("region_inflow", ColumnType::Text),
        Column::new("value_inflow", ColumnType::Real),
        Column::new("value_emission", ColumnType::Real),
        Column::new("unit_inflow", ColumnType::Text),
    ],
    foreign_keys: &[
        ForeignKey::code("flow_reference", "activities"),
        ForeignKey::code("region_reference", "locations"),
    ],
};

// =============================================================================
// Spreadsheet-derived tables
// =============================================================================

pub static AGRIBALYSE: TableSchema = TableSchema {
    name: "agribalyse",
    source_file: "agribalyse_data.csv",
    columns: &[
        Column::new("food_group", ColumnType::Text),
        Column::new("subgroup", ColumnType::Text),
        Column::required("product_name", ColumnType::Text),
        Column::new("dqr", ColumnType::Real),
        Column::new("agriculture", ColumnType::Real),
        Column::new("processing", ColumnType::Real),
        Column::new("packaging", ColumnType::Real),
        Column::new("transportation", ColumnType::Real),
        Column::new("retail", ColumnType::Real),
        Column::new("consumption", ColumnType::Real),
        Column::new("total", ColumnType::Real),
    ],
    foreign_keys: &[],
};

pub static BIG_CLIMATE: TableSchema = TableSchema {
    name: "big_climate",
    source_file: "bigclimatedb.csv",
    columns: &[
        Column::required("name", ColumnType::Text),
        Column::new("category", ColumnType::Text),
        Column::new("total", ColumnType::Real),
        Column::new("agriculture", ColumnType::Real),
        Column::new("iluc", ColumnType::Real),
        Column::new("food_processing", ColumnType::Real),
        Column::new("packaging", ColumnType::Real),
        Column::new("transport", ColumnType::Real),
        Column::new("retail", ColumnType::Real),
        Column::required("region", ColumnType::Text),
    ],
    foreign_keys: &[],
};

/// All tables in dependency order (parents before children)
pub static ALL_TABLES: &[&TableSchema] = &[
    &ACTIVITIES,
    &LOCATIONS,
    &FOOTPRINTS,
    &RECIPES,
    &AGRIBALYSE,
    &BIG_CLIMATE,
];

/// Get table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}
