//! Core traits shared by the country-year table models

use arrow::datatypes::{FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_arrow::schema::{SchemaLike, TracingOptions};

use crate::error::{PipelineError, Result, Stage};

/// Records that are uniquely identified by a (country, year) pair
pub trait CountryYear {
    /// Country name as it appears in the source
    fn country(&self) -> &str;

    /// Calendar year of the observation
    fn year(&self) -> i32;

    /// The (country, year) key
    fn key(&self) -> (&str, i32) {
        (self.country(), self.year())
    }
}

/// A trait for models that convert to and from Arrow record batches.
///
/// The schema is traced from the Rust type with `serde_arrow`, so the
/// column order of a written table is the field order of the struct.
pub trait ArrowSchema: Serialize + DeserializeOwned + Sized {
    /// Arrow fields traced from the model type
    fn fields() -> Result<Vec<FieldRef>> {
        Vec::<FieldRef>::from_type::<Self>(TracingOptions::default().allow_null_fields(true))
            .map_err(|e| PipelineError::serialization(format!("Schema generation error: {e}")))
    }

    /// Get the Arrow schema for this model
    fn schema() -> Result<Schema> {
        Ok(Schema::new(Self::fields()?))
    }

    /// Convert a vector of this model to a `RecordBatch`
    fn to_record_batch(models: &[Self]) -> Result<RecordBatch> {
        let fields = Self::fields()?;
        serde_arrow::to_record_batch(&fields, &models)
            .map_err(|e| PipelineError::serialization(format!("Serialization error: {e}")))
    }

    /// Convert a `RecordBatch` to a vector of this model
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        serde_arrow::from_record_batch(batch)
            .map_err(|e| PipelineError::serialization(format!("Deserialization error: {e}")))
    }
}

/// Check that no two records share a (country, year) key
pub fn ensure_unique_keys<T: CountryYear>(records: &[T], stage: Stage, table: &str) -> Result<()> {
    let mut seen = FxHashSet::default();
    seen.reserve(records.len());

    for record in records {
        let (country, year) = record.key();
        if !seen.insert((country, year)) {
            return Err(PipelineError::invariant(
                stage,
                format!("duplicate key ({country}, {year}) in {table} table"),
            ));
        }
    }

    Ok(())
}
