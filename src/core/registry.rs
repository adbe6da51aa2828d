//! FilterFieldRegistry: static per-view catalog of filterable fields and table columns
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::models::{ColumnDef, FilterFieldConfig, ViewCatalog};
use crate::core::types::{FieldType, ViewKey};
use crate::error::CatalogError;

const BUILTIN_CATALOG: &str = include_str!("../../.config/catalog.json5");

/// On-disk shape of a catalog document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub views: BTreeMap<ViewKey, ViewCatalog>,
}

/// Read-only lookup of view catalogs
///
/// Entries are validated once when the registry is built and never mutated
/// afterwards. Lookups for an unknown view return empty slices.
#[derive(Debug, Clone, Default)]
pub struct FilterFieldRegistry {
    views: BTreeMap<ViewKey, ViewCatalog>,
}

impl FilterFieldRegistry {
    /// Registry of the catalog embedded in the crate
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json5(BUILTIN_CATALOG)
    }

    /// Parse and validate a JSON5 catalog document
    pub fn from_json5(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            json5::from_str(source).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_catalogs(file.views)
    }

    /// Validate and wrap a set of view catalogs
    pub fn from_catalogs(views: BTreeMap<ViewKey, ViewCatalog>) -> Result<Self, CatalogError> {
        for (view, catalog) in &views {
            validate_catalog(view, catalog)?;
        }
        debug!("Built registry with {} views", views.len());
        Ok(Self { views })
    }

    /// Layer another registry over this one; its views replace same-named views
    pub fn merge(mut self, other: FilterFieldRegistry) -> Self {
        for (view, catalog) in other.views {
            debug!("Catalog override for view '{}'", view);
            self.views.insert(view, catalog);
        }
        self
    }

    /// Ordered filterable fields of a view
    pub fn get_fields(&self, view: &ViewKey) -> &[FilterFieldConfig] {
        self.views
            .get(view)
            .map(|c| c.fields.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_field(&self, view: &ViewKey, key: &str) -> Option<&FilterFieldConfig> {
        self.get_fields(view).iter().find(|f| f.key == key)
    }

    /// Field keys visible right after initialization
    pub fn default_visible(&self, view: &ViewKey) -> &[String] {
        self.views
            .get(view)
            .map(|c| c.default_visible.as_slice())
            .unwrap_or(&[])
    }

    /// Ordered table columns of a view
    pub fn columns(&self, view: &ViewKey) -> &[ColumnDef] {
        self.views
            .get(view)
            .map(|c| c.columns.as_slice())
            .unwrap_or(&[])
    }

    /// Column keys visible after a column reset
    pub fn default_columns(&self, view: &ViewKey) -> &[String] {
        self.views
            .get(view)
            .map(|c| c.default_columns.as_slice())
            .unwrap_or(&[])
    }

    pub fn catalog(&self, view: &ViewKey) -> Option<&ViewCatalog> {
        self.views.get(view)
    }

    pub fn contains_view(&self, view: &ViewKey) -> bool {
        self.views.contains_key(view)
    }

    pub fn views(&self) -> impl Iterator<Item = &ViewKey> {
        self.views.keys()
    }
}

fn validate_catalog(view: &ViewKey, catalog: &ViewCatalog) -> Result<(), CatalogError> {
    let mut field_keys = HashSet::new();
    for field in &catalog.fields {
        if !field_keys.insert(field.key.as_str()) {
            return Err(CatalogError::DuplicateField {
                view: view.to_string(),
                key: field.key.clone(),
            });
        }
        match (field.field_type, field.options.is_empty()) {
            (FieldType::Select, true) => {
                return Err(CatalogError::MissingOptions {
                    view: view.to_string(),
                    key: field.key.clone(),
                });
            }
            (FieldType::Text | FieldType::DateRange | FieldType::Number, false) => {
                return Err(CatalogError::UnexpectedOptions {
                    view: view.to_string(),
                    key: field.key.clone(),
                });
            }
            _ => {}
        }
    }
    if let Some(key) = catalog
        .default_visible
        .iter()
        .find(|k| !field_keys.contains(k.as_str()))
    {
        return Err(CatalogError::UnknownDefaultField {
            view: view.to_string(),
            key: key.clone(),
        });
    }

    let mut column_keys = HashSet::new();
    for column in &catalog.columns {
        if !column_keys.insert(column.key.as_str()) {
            return Err(CatalogError::DuplicateColumn {
                view: view.to_string(),
                key: column.key.clone(),
            });
        }
    }
    if let Some(key) = catalog
        .default_columns
        .iter()
        .find(|k| !column_keys.contains(k.as_str()))
    {
        return Err(CatalogError::UnknownDefaultColumn {
            view: view.to_string(),
            key: key.clone(),
        });
    }
    Ok(())
}
