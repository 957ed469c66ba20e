use crate::core::allocation::{BudgetTable, Group, LineItem};
use crate::core::engine::ChildUpdates;
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{fs, path::PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LineItemConfig {
    pub id: String,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GroupConfig {
    pub id: String,
    pub label: String,
    /// Defaults to the sum of the children when omitted.
    pub value: Option<f64>,
    #[serde(default)]
    pub children: Vec<LineItemConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_precision")]
    pub precision: usize,
    pub currency: Option<String>,
}

fn default_precision() -> usize {
    2
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            precision: default_precision(),
            currency: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AllocationConfig {
    #[serde(default)]
    pub child_updates: ChildUpdates,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    pub groups: Vec<GroupConfig>,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub allocation: AllocationConfig,
}

/// The sample budget used when no configuration file exists.
pub const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

impl Default for AppConfig {
    fn default() -> Self {
        let item = |id: &str, label: &str, value: f64| LineItemConfig {
            id: id.to_string(),
            label: label.to_string(),
            value,
        };
        AppConfig {
            groups: vec![
                GroupConfig {
                    id: "electronics".to_string(),
                    label: "Electronics".to_string(),
                    value: Some(1500.0),
                    children: vec![
                        item("phones", "Phones", 800.0),
                        item("laptops", "Laptops", 700.0),
                    ],
                },
                GroupConfig {
                    id: "furniture".to_string(),
                    label: "Furniture".to_string(),
                    value: Some(1000.0),
                    children: vec![
                        item("tables", "Tables", 300.0),
                        item("chairs", "Chairs", 700.0),
                    ],
                },
            ],
            display: DisplayConfig::default(),
            allocation: AllocationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config at the default location, falling back to the sample
    /// budget when the file does not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config found, using sample budget");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "budgetree", "budgetree")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Builds the seed table, rejecting duplicate ids and non-finite values.
    pub fn seed_table(&self) -> Result<BudgetTable> {
        let mut seen = HashSet::new();
        let mut check_id = |id: &str| -> Result<()> {
            if id.is_empty() {
                bail!("Row ids must not be empty");
            }
            if !seen.insert(id.to_string()) {
                bail!("Duplicate row id: {id}");
            }
            Ok(())
        };

        let mut groups = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            check_id(&group.id)?;
            let mut children = Vec::with_capacity(group.children.len());
            for child in &group.children {
                check_id(&child.id)?;
                if !child.value.is_finite() {
                    bail!("Value of {} must be a finite number", child.id);
                }
                children.push(LineItem::new(&child.id, &child.label, child.value));
            }

            let children_total: f64 = children.iter().map(|c| c.value).sum();
            if !children_total.is_finite() {
                bail!("Children of {} must sum to a finite number", group.id);
            }
            let value = match group.value {
                Some(v) if !v.is_finite() => bail!("Value of {} must be a finite number", group.id),
                Some(v) => {
                    if !children.is_empty() && (v - children_total).abs() > 1e-9 * v.abs().max(1.0)
                    {
                        warn!(
                            group = %group.id,
                            value = v,
                            children_total,
                            "Group value does not match the sum of its children"
                        );
                    }
                    v
                }
                None => children_total,
            };
            groups.push(Group::new(&group.id, &group.label, value, children));
        }
        Ok(BudgetTable::new(groups))
    }
}
