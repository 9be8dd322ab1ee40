//! Conversion between profiles, results and polars DataFrames
//!
//! Each numeric column of a frame becomes a profile variable; nulls and
//! non-finite values are missing. Flags are exported as one Int32 column per
//! test plus `overall`.

use crate::app::models::{MaskedSeries, Profile};
use crate::app::services::profile_qc::QcResult;
use crate::{QcError, Result};
use polars::prelude::*;
use tracing::debug;

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32
    )
}

impl Profile {
    /// Build a profile from the numeric columns of `df`
    ///
    /// Other columns (station names, timestamps) are ignored.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let mut profile = Profile::new();

        for column in df.get_columns() {
            if !is_numeric(column.dtype()) {
                debug!(
                    "Ignoring non-numeric column '{}' ({})",
                    column.name(),
                    column.dtype()
                );
                continue;
            }

            let values: Vec<Option<f64>> = column
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .collect();
            profile.insert(column.name().as_str(), MaskedSeries::new(values));
        }

        Ok(profile)
    }
}

impl QcResult {
    /// Flags of `variable` with one column per test, `overall` included
    pub fn flags_frame(&self, variable: &str) -> Result<DataFrame> {
        let tests = self
            .flags
            .get(variable)
            .ok_or_else(|| QcError::variable_not_evaluated(variable))?;

        let columns = tests
            .iter()
            .map(|(test, flags)| {
                let codes: Vec<i32> = flags.iter().map(|flag| i32::from(flag.code())).collect();
                Column::new(test.as_str().into(), codes)
            })
            .collect();

        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::config_resolver::load_config;
    use crate::app::services::profile_qc::ProfileQc;
    use crate::app::services::capabilities::Capabilities;
    use serde_json::json;

    fn cast_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("station".into(), vec!["A", "A", "A"]),
            Column::new("pressure".into(), vec![0i64, 10, 20]),
            Column::new("temperature".into(), vec![Some(20.0), None, Some(f64::NAN)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_profile_from_dataframe() {
        let profile = Profile::from_dataframe(&cast_frame()).unwrap();

        assert!(!profile.contains("station"));
        assert_eq!(
            profile.get("pressure").unwrap().values(),
            &[Some(0.0), Some(10.0), Some(20.0)]
        );
        assert_eq!(
            profile.get("temperature").unwrap().values(),
            &[Some(20.0), None, None]
        );
    }

    #[test]
    fn test_flags_frame() {
        let config = load_config(json!({
            "temperature": {"global_range": {"minval": 0, "maxval": 15}}
        }))
        .unwrap();
        let qc = ProfileQc::builder(config)
            .with_capabilities(Capabilities::none())
            .build()
            .unwrap();
        let result = qc.evaluate(&Profile::from_dataframe(&cast_frame()).unwrap());

        let frame = result.flags_frame("temperature").unwrap();

        assert_eq!(frame.height(), 3);
        let overall: Vec<Option<i32>> = frame
            .column("overall")
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(overall, vec![Some(4), Some(9), Some(9)]);
        assert!(frame.column("global_range").is_ok());
    }

    #[test]
    fn test_flags_frame_unknown_variable() {
        match QcResult::default().flags_frame("salinity") {
            Err(QcError::VariableNotEvaluated { variable }) => assert_eq!(variable, "salinity"),
            other => panic!("Expected VariableNotEvaluated, got {other:?}"),
        }
    }
}
