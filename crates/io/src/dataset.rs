//! A table bundled with its column roles and catchment metadata.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use rill_series::{Aggregation, Frequency, TimeSeries};

use crate::error::IoError;
use crate::reader::{ReaderConfig, read_table};
use crate::table::Table;

/// Name used when a dataset has none.
pub const UNNAMED: &str = "Unnamed catchment";

/// Descriptive information about the catchment behind a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Metadata {
    pub name: Option<String>,
    pub river: Option<String>,
    pub station: Option<String>,
    pub area_km2: Option<f64>,
    /// Unit per column or role, e.g. `discharge = "m3/s"`.
    pub units: BTreeMap<String, String>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

impl Metadata {
    /// The name, or [`UNNAMED`].
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED)
    }
}

/// A logical column role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Observed,
    Simulated,
    Precipitation,
    Evapotranspiration,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Observed => "observed",
            Self::Simulated => "simulated",
            Self::Precipitation => "precipitation",
            Self::Evapotranspiration => "evapotranspiration",
        })
    }
}

/// Maps roles to column names. Unmapped roles are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnRoles {
    pub observed: Option<String>,
    pub simulated: Option<String>,
    pub precipitation: Option<String>,
    pub evapotranspiration: Option<String>,
}

impl ColumnRoles {
    pub fn column(&self, role: Role) -> Option<&str> {
        match role {
            Role::Observed => self.observed.as_deref(),
            Role::Simulated => self.simulated.as_deref(),
            Role::Precipitation => self.precipitation.as_deref(),
            Role::Evapotranspiration => self.evapotranspiration.as_deref(),
        }
    }

    /// Mapped `(role, column)` pairs in role order.
    pub fn mapped(&self) -> Vec<(Role, &str)> {
        [
            Role::Observed,
            Role::Simulated,
            Role::Precipitation,
            Role::Evapotranspiration,
        ]
        .into_iter()
        .filter_map(|role| self.column(role).map(|c| (role, c)))
        .collect()
    }
}

/// A [`Table`] plus the roles of its columns and the catchment it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    table: Table,
    roles: ColumnRoles,
    meta: Metadata,
}

impl Dataset {
    pub fn new(table: Table, roles: ColumnRoles, meta: Metadata) -> Self {
        Self { table, roles, meta }
    }

    /// Read a dataset from CSV.
    ///
    /// Every mapped role must name an existing column. Without a metadata
    /// name, the file path is used.
    ///
    /// # Errors
    ///
    /// Everything [`read_table`] returns, plus [`IoError::MissingColumn`]
    /// for a mapped column that is absent.
    pub fn from_csv(
        path: &Path,
        config: &ReaderConfig,
        roles: ColumnRoles,
        mut meta: Metadata,
    ) -> Result<Self, IoError> {
        let table = read_table(path, config)?;
        if let Some((_, name)) = roles
            .mapped()
            .into_iter()
            .find(|(_, name)| table.column(name).is_none())
        {
            return Err(IoError::MissingColumn {
                name: name.to_string(),
                path: path.to_path_buf(),
            });
        }
        meta.name.get_or_insert_with(|| path.display().to_string());
        Ok(Self::new(table, roles, meta))
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn roles(&self) -> &ColumnRoles {
        &self.roles
    }

    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    /// The column mapped to `role` as a series.
    ///
    /// # Errors
    ///
    /// [`IoError::MissingRole`] if the role is unmapped;
    /// [`IoError::MissingRoleColumn`] if the mapped column is absent.
    pub fn role(&self, role: Role) -> Result<TimeSeries, IoError> {
        let name = self
            .roles
            .column(role)
            .ok_or(IoError::MissingRole { role: role.to_string() })?;
        match self.table.series(name) {
            Some(series) => Ok(series?),
            None => Err(IoError::MissingRoleColumn {
                role: role.to_string(),
                name: name.to_string(),
            }),
        }
    }

    pub fn observed(&self) -> Result<TimeSeries, IoError> {
        self.role(Role::Observed)
    }

    pub fn simulated(&self) -> Result<TimeSeries, IoError> {
        self.role(Role::Simulated)
    }

    pub fn precipitation(&self) -> Result<TimeSeries, IoError> {
        self.role(Role::Precipitation)
    }

    pub fn evapotranspiration(&self) -> Result<TimeSeries, IoError> {
        self.role(Role::Evapotranspiration)
    }

    /// Rows in `[start, end]`, roles and metadata kept.
    pub fn subset(&self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::new(
            self.table.subset(start, end),
            self.roles.clone(),
            self.meta.clone(),
        )
    }

    /// Resample every column, roles and metadata kept.
    ///
    /// # Errors
    ///
    /// See [`Table::resample`].
    pub fn resample(&self, freq: Frequency, how: Aggregation) -> Result<Self, IoError> {
        Ok(Self::new(
            self.table.resample(freq, how)?,
            self.roles.clone(),
            self.meta.clone(),
        ))
    }
}
