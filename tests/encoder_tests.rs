use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use datafusion::datasource::memory::MemTable;
use datafusion::prelude::*;
use tokio;

use feature_encoding::encoder::{Encoder, EncoderMethod};
use feature_encoding::encoders::{HashingEncoder, OneHotEncoder};
use feature_encoding::exceptions::{FeatureEncodingError, FeatureEncodingResult};
use feature_encoding::feature::{Feature, TransformPrimitive};
use feature_encoding::mapping::ColumnMapping;
use feature_encoding::primitives::{BinaryEnc, HashingEnc, LeaveOneOutEnc, OrdinalEnc, TargetEnc};

/// Helper to build the feature-matrix DataFrame used across the encoder tests:
/// two categorical columns, a boolean and a numeric passthrough column.
async fn create_feature_matrix() -> DataFrame {
    let schema = Arc::new(Schema::new(vec![
        Field::new("product_id", DataType::Utf8, true),
        Field::new("purchased", DataType::Boolean, true),
        Field::new("value", DataType::Float64, true),
        Field::new("countrycode", DataType::Utf8, true),
    ]));
    let product: ArrayRef = Arc::new(StringArray::from(vec![
        Some("coke zero"),
        Some("coke zero"),
        Some("coke zero"),
        Some("car"),
        Some("car"),
        Some("toothpaste"),
    ]));
    let purchased: ArrayRef = Arc::new(BooleanArray::from(vec![
        true, true, true, true, true, true,
    ]));
    let value: ArrayRef = Arc::new(Float64Array::from(vec![0.0, 5.0, 10.0, 15.0, 20.0, 0.0]));
    let country: ArrayRef = Arc::new(StringArray::from(vec![
        Some("US"),
        Some("US"),
        Some("US"),
        Some("US"),
        Some("US"),
        Some("AL"),
    ]));
    let batch =
        RecordBatch::try_new(schema.clone(), vec![product, purchased, value, country]).unwrap();
    let mem_table = MemTable::try_new(schema, vec![vec![batch]]).unwrap();
    let ctx = SessionContext::new();
    ctx.register_table("t", Arc::new(mem_table)).unwrap();
    ctx.table("t").await.unwrap()
}

fn base_features() -> Vec<Feature> {
    vec![
        Feature::new("product_id"),
        Feature::new("purchased"),
        Feature::new("value"),
        Feature::new("countrycode"),
    ]
}

/// Helper to build a single-column categorical DataFrame with (optionally) a
/// numeric target column, for the supervised encoder tests.
async fn create_categorical_df(with_target: bool) -> DataFrame {
    let fields = if with_target {
        vec![
            Field::new("color", DataType::Utf8, true),
            Field::new("target", DataType::Float64, true),
        ]
    } else {
        vec![Field::new("color", DataType::Utf8, true)]
    };
    let schema = Arc::new(Schema::new(fields));

    let colors = vec![
        Some("red"),
        Some("blue"),
        Some("red"),
        Some("green"),
        Some("blue"),
        Some("red"),
    ];
    let color_array: ArrayRef = Arc::new(StringArray::from(colors));

    let batch = if with_target {
        let target_vals = vec![
            Some(10.0),
            Some(20.0),
            Some(10.0),
            Some(30.0),
            Some(20.0),
            Some(10.0),
        ];
        let target_array: ArrayRef = Arc::new(Float64Array::from(target_vals));
        RecordBatch::try_new(schema.clone(), vec![color_array, target_array]).unwrap()
    } else {
        RecordBatch::try_new(schema.clone(), vec![color_array]).unwrap()
    };

    let mem_table = MemTable::try_new(schema, vec![vec![batch]]).unwrap();
    let ctx = SessionContext::new();
    ctx.register_table("t", Arc::new(mem_table)).unwrap();
    ctx.table("t").await.unwrap()
}

/// Helper to build a single string-column DataFrame from explicit values.
async fn create_string_df(col_name: &str, values: Vec<Option<&str>>) -> DataFrame {
    let schema = Arc::new(Schema::new(vec![Field::new(col_name, DataType::Utf8, true)]));
    let array: ArrayRef = Arc::new(StringArray::from(values));
    let batch = RecordBatch::try_new(schema.clone(), vec![array]).unwrap();
    let mem_table = MemTable::try_new(schema, vec![vec![batch]]).unwrap();
    let ctx = SessionContext::new();
    ctx.register_table("t", Arc::new(mem_table)).unwrap();
    ctx.table("t").await.unwrap()
}

fn int64_column(batch: &RecordBatch, name: &str) -> Vec<i64> {
    let idx = batch.schema().index_of(name).unwrap();
    let array = batch
        .column(idx)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap_or_else(|| panic!("Expected Int64Array for column {}", name));
    (0..array.len()).map(|i| array.value(i)).collect()
}

fn int32_column(batch: &RecordBatch, name: &str) -> Vec<i32> {
    let idx = batch.schema().index_of(name).unwrap();
    let array = batch
        .column(idx)
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap_or_else(|| panic!("Expected Int32Array for column {}", name));
    (0..array.len()).map(|i| array.value(i)).collect()
}

fn float64_column(batch: &RecordBatch, name: &str) -> Vec<f64> {
    let idx = batch.schema().index_of(name).unwrap();
    let array = batch
        .column(idx)
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap_or_else(|| panic!("Expected Float64Array for column {}", name));
    (0..array.len()).map(|i| array.value(i)).collect()
}

fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect()
}

#[tokio::test]
async fn test_ordinal_encoding() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let mut enc = Encoder::new("ordinal", None)?;
    let encoded = enc.fit_transform(&df, &base_features(), None).await?;
    let batches = encoded.collect().await?;
    let batch = batches.first().expect("Expected at least one batch");

    assert_eq!(
        column_names(batch),
        vec![
            "PRODUCT_ID_ordinal",
            "purchased",
            "value",
            "COUNTRYCODE_ordinal"
        ]
    );
    // First-seen codes start at 1: coke zero -> 1, car -> 2, toothpaste -> 3.
    assert_eq!(int64_column(batch, "PRODUCT_ID_ordinal"), vec![1, 1, 1, 2, 2, 3]);
    assert_eq!(int64_column(batch, "COUNTRYCODE_ordinal"), vec![1, 1, 1, 1, 1, 2]);

    // Replaying the frozen mapping reproduces the documented example.
    let encoder = OrdinalEnc::new(&enc, "product_id")?;
    let replayed = encoder.transform(&[
        Some("car"),
        Some("toothpaste"),
        Some("coke zero"),
        Some("coke zero"),
    ]);
    assert_eq!(replayed, vec![vec![2.0, 3.0, 1.0, 1.0]]);

    // The rewritten feature list matches a manually constructed one.
    let base = base_features();
    let product_feature = Feature::transformed(&base[0], Arc::new(OrdinalEnc::new(&enc, 0_usize)?));
    let cc_feature = Feature::transformed(&base[3], Arc::new(OrdinalEnc::new(&enc, 1_usize)?));
    let expected = vec![
        product_feature,
        base[1].clone(),
        base[2].clone(),
        cc_feature,
    ];
    assert_eq!(expected, enc.get_features().to_vec());
    Ok(())
}

#[tokio::test]
async fn test_ordinal_batch_transform_matches_replay() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let mut enc = Encoder::new("ordinal", Some(vec!["product_id".to_string()]))?;
    enc.fit(&df, &base_features(), None).await?;

    let batches = enc.transform(df)?.collect().await?;
    let batch = batches.first().expect("Expected at least one batch");
    let batch_codes = int64_column(batch, "PRODUCT_ID_ordinal");

    let raw = [
        Some("coke zero"),
        Some("coke zero"),
        Some("coke zero"),
        Some("car"),
        Some("car"),
        Some("toothpaste"),
    ];
    let replayed = OrdinalEnc::new(&enc, "product_id")?.transform(&raw);
    for (batch_code, replay_code) in batch_codes.iter().zip(&replayed[0]) {
        assert_eq!(*batch_code as f64, *replay_code);
    }
    Ok(())
}

#[tokio::test]
async fn test_transform_is_idempotent() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let mut enc = Encoder::new("ordinal", None)?;
    enc.fit(&df, &base_features(), None).await?;

    let first = enc.transform(df.clone())?.collect().await?;
    let second = enc.transform(df)?.collect().await?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_binary_encoding() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let mut enc = Encoder::new("binary", None)?;
    let encoded = enc.fit_transform(&df, &base_features(), None).await?;
    let batches = encoded.collect().await?;
    let batch = batches.first().expect("Expected at least one batch");

    // Three product categories need two digits; expansions stay contiguous at
    // the original input's position.
    assert_eq!(
        column_names(batch),
        vec![
            "PRODUCT_ID_binary__0",
            "PRODUCT_ID_binary__1",
            "purchased",
            "value",
            "COUNTRYCODE_binary__0",
            "COUNTRYCODE_binary__1"
        ]
    );
    // Codes: coke zero -> 1 (01), car -> 2 (10), toothpaste -> 3 (11), MSB first.
    assert_eq!(int64_column(batch, "PRODUCT_ID_binary__0"), vec![0, 0, 0, 1, 1, 1]);
    assert_eq!(int64_column(batch, "PRODUCT_ID_binary__1"), vec![1, 1, 1, 0, 0, 1]);

    // Replay reproduces the digit columns for fresh values.
    let encoder = BinaryEnc::new(&enc, "product_id")?;
    assert_eq!(encoder.number_output_features(), 2);
    let replayed = encoder.transform(&[
        Some("car"),
        Some("toothpaste"),
        Some("coke zero"),
        Some("coke zero"),
    ]);
    assert_eq!(
        replayed,
        vec![vec![1.0, 1.0, 0.0, 0.0], vec![0.0, 1.0, 1.0, 1.0]]
    );

    // Output arity is frozen at fit time and reported by the feature handle.
    assert_eq!(enc.get_features()[0].number_output_features(), 2);
    assert_eq!(
        enc.get_features()[0].feature_names(),
        vec!["PRODUCT_ID_binary__0", "PRODUCT_ID_binary__1"]
    );
    Ok(())
}

#[tokio::test]
async fn test_binary_arity_is_constant_for_new_data() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let mut enc = Encoder::new("binary", Some(vec!["product_id".to_string()]))?;
    enc.fit(&df, &[Feature::new("product_id")], None).await?;

    // New data with higher cardinality still encodes into the fitted width,
    // with unseen categories expanding to all-zero digits.
    let new_df = create_string_df(
        "product_id",
        vec![Some("car"), Some("boat"), Some("plane"), None],
    )
    .await;
    let batches = enc.transform(new_df)?.collect().await?;
    let batch = batches.first().expect("Expected at least one batch");
    assert_eq!(
        column_names(batch),
        vec!["PRODUCT_ID_binary__0", "PRODUCT_ID_binary__1"]
    );
    assert_eq!(int64_column(batch, "PRODUCT_ID_binary__0"), vec![1, 0, 0, 0]);
    assert_eq!(int64_column(batch, "PRODUCT_ID_binary__1"), vec![0, 0, 0, 0]);
    Ok(())
}

#[tokio::test]
async fn test_one_hot_encoding() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let mut enc = Encoder::new("one_hot", Some(vec!["product_id".to_string()]))?;
    let encoded = enc.fit_transform(&df, &base_features(), None).await?;
    let batches = encoded.collect().await?;
    let batch = batches.first().expect("Expected at least one batch");

    // Indicator features ranked by fit-time frequency, contiguous at the
    // input's position; no missing flag because the fit data had no nulls.
    assert_eq!(
        column_names(batch),
        vec![
            "product_id = coke zero",
            "product_id = car",
            "product_id = toothpaste",
            "purchased",
            "value",
            "countrycode"
        ]
    );
    assert_eq!(
        int32_column(batch, "product_id = coke zero"),
        vec![1, 1, 1, 0, 0, 0]
    );
    assert_eq!(int32_column(batch, "product_id = car"), vec![0, 0, 0, 1, 1, 0]);
    assert_eq!(
        int32_column(batch, "product_id = toothpaste"),
        vec![0, 0, 0, 0, 0, 1]
    );

    // Every row's indicators sum to exactly one.
    for i in 0..6 {
        let total: i32 = ["coke zero", "car", "toothpaste"]
            .iter()
            .map(|cat| int32_column(batch, &format!("product_id = {}", cat))[i])
            .sum();
        assert_eq!(total, 1, "Row {} should have exactly one indicator set", i);
    }
    Ok(())
}

#[tokio::test]
async fn test_one_hot_missing_flag_fires_only_for_null() -> FeatureEncodingResult<()> {
    let df = create_string_df(
        "product_id",
        vec![Some("coke zero"), Some("coke zero"), Some("car"), None],
    )
    .await;
    let mut enc = Encoder::new("one_hot", Some(vec!["product_id".to_string()]))?;
    enc.fit(&df, &[Feature::new("product_id")], None).await?;

    let names: Vec<String> = enc
        .get_features()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "product_id = coke zero",
            "product_id = car",
            "product_id is null"
        ]
    );

    // An unseen but non-null category must NOT set the missing flag: the row
    // encodes as all zeros. Only the genuine null row sets the flag.
    let new_df = create_string_df("product_id", vec![Some("boat"), None, Some("car")]).await;
    let batches = enc.transform(new_df)?.collect().await?;
    let batch = batches.first().expect("Expected at least one batch");
    assert_eq!(int32_column(batch, "product_id = coke zero"), vec![0, 0, 0]);
    assert_eq!(int32_column(batch, "product_id = car"), vec![0, 0, 1]);
    assert_eq!(int32_column(batch, "product_id is null"), vec![0, 1, 0]);
    Ok(())
}

#[tokio::test]
async fn test_one_hot_top_n_truncation() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let adapter = OneHotEncoder::new(Some(vec!["product_id".to_string()])).with_top_n(2);
    let mut enc = Encoder::from_method(EncoderMethod::OneHot(adapter));
    enc.fit(&df, &[Feature::new("product_id")], None).await?;

    // Only the two most frequent categories survive the cutoff.
    let names: Vec<String> = enc
        .get_features()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    assert_eq!(names, vec!["product_id = coke zero", "product_id = car"]);

    let batches = enc.transform(df)?.collect().await?;
    let batch = batches.first().expect("Expected at least one batch");
    // The toothpaste row falls outside the retained set: all zeros.
    assert_eq!(
        int32_column(batch, "product_id = coke zero"),
        vec![1, 1, 1, 0, 0, 0]
    );
    assert_eq!(int32_column(batch, "product_id = car"), vec![0, 0, 0, 1, 1, 0]);
    Ok(())
}

#[tokio::test]
async fn test_hashing_encoding() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let mut enc = Encoder::new("hashing", Some(vec!["product_id".to_string()]))?;
    let encoded = enc.fit_transform(&df, &base_features(), None).await?;
    let batches = encoded.collect().await?;
    let batch = batches.first().expect("Expected at least one batch");

    assert_eq!(enc.get_hash_method()?.name(), "ahash");
    assert_eq!(enc.get_n_components()?, 8);
    let names = column_names(batch);
    assert_eq!(names.len(), 8 + 3);
    assert_eq!(names[0], "PRODUCT_ID_hashing__0");
    assert_eq!(names[7], "PRODUCT_ID_hashing__7");

    // Each row lands in exactly one bucket, and identical values always land
    // in the identical bucket.
    let columns: Vec<Vec<i64>> = (0..8)
        .map(|i| int64_column(batch, &format!("PRODUCT_ID_hashing__{}", i)))
        .collect();
    for row in 0..6 {
        let total: i64 = columns.iter().map(|c| c[row]).sum();
        assert_eq!(total, 1, "Row {} should land in exactly one bucket", row);
    }
    for (a, b) in [(0, 1), (1, 2), (3, 4)] {
        for column in &columns {
            assert_eq!(column[a], column[b], "Equal values must hash identically");
        }
    }

    // The replay primitive reconstructs the same bucketing from the method
    // name and component count alone.
    let encoder = HashingEnc::new(&enc)?;
    assert_eq!(encoder.number_output_features(), 8);
    let raw = [
        Some("coke zero"),
        Some("coke zero"),
        Some("coke zero"),
        Some("car"),
        Some("car"),
        Some("toothpaste"),
    ];
    let replayed = encoder.transform(&raw);
    for (component, column) in columns.iter().enumerate() {
        for row in 0..6 {
            assert_eq!(column[row] as f64, replayed[component][row]);
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_hashing_arity_ignores_cardinality() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let adapter = HashingEncoder::new(Some(vec!["product_id".to_string()])).with_n_components(4);
    let mut enc = Encoder::from_method(EncoderMethod::Hashing(adapter));
    enc.fit(&df, &[Feature::new("product_id")], None).await?;
    assert_eq!(enc.get_n_components()?, 4);

    // Unseen categories still hash into the fixed schema.
    let new_df = create_string_df(
        "product_id",
        vec![Some("boat"), Some("plane"), Some("boat"), None],
    )
    .await;
    let batches = enc.transform(new_df)?.collect().await?;
    let batch = batches.first().expect("Expected at least one batch");
    assert_eq!(column_names(batch).len(), 4);
    for row in 0..4 {
        let total: i64 = (0..4)
            .map(|i| int64_column(batch, &format!("PRODUCT_ID_hashing__{}", i))[row])
            .sum();
        assert_eq!(total, 1);
    }
    Ok(())
}

#[tokio::test]
async fn test_target_encoding() -> FeatureEncodingResult<()> {
    let df = create_categorical_df(true).await;
    let mut enc = Encoder::new("target", Some(vec!["color".to_string()]))?;
    let features = vec![Feature::new("color"), Feature::new("target")];
    let encoded = enc.fit_transform(&df, &features, Some("target")).await?;
    let batches = encoded.collect().await?;
    let batch = batches.first().expect("Expected at least one batch");

    assert_eq!(column_names(batch), vec!["COLOR_target", "target"]);
    // Prior = 15. Category means: red 10 (n=3), blue 20 (n=2), green 30 (n=1).
    // Logistic smoothing pulls rare categories toward the prior.
    let w3 = 1.0 / (1.0 + (-2.0_f64).exp());
    let w2 = 1.0 / (1.0 + (-1.0_f64).exp());
    let expected = vec![
        15.0 * (1.0 - w3) + 10.0 * w3,
        15.0 * (1.0 - w2) + 20.0 * w2,
        15.0 * (1.0 - w3) + 10.0 * w3,
        15.0 * 0.5 + 30.0 * 0.5,
        15.0 * (1.0 - w2) + 20.0 * w2,
        15.0 * (1.0 - w3) + 10.0 * w3,
    ];
    let actual = float64_column(batch, "COLOR_target");
    for (i, (got, want)) in actual.iter().zip(&expected).enumerate() {
        assert!(
            approx::abs_diff_eq!(got, want, epsilon = 1e-9),
            "Row {}: expected {}, got {}",
            i,
            want,
            got
        );
    }

    // Unseen and missing values replay to the global prior.
    let encoder = TargetEnc::new(&enc, "color")?;
    let replayed = encoder.transform(&[Some("yellow"), None]);
    assert!(approx::abs_diff_eq!(replayed[0][0], 15.0, epsilon = 1e-12));
    assert!(approx::abs_diff_eq!(replayed[0][1], 15.0, epsilon = 1e-12));
    Ok(())
}

#[tokio::test]
async fn test_target_encoding_requires_target() -> FeatureEncodingResult<()> {
    let df = create_categorical_df(true).await;
    let mut enc = Encoder::new("target", Some(vec!["color".to_string()]))?;
    let result = enc.fit(&df, &[Feature::new("color")], None).await;
    assert!(matches!(
        result,
        Err(FeatureEncodingError::MissingTarget(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_leave_one_out_fit_transform_excludes_own_label() -> FeatureEncodingResult<()> {
    let df = create_categorical_df(true).await;
    let mut enc = Encoder::new("leave_one_out", Some(vec!["color".to_string()]))?;
    let features = vec![Feature::new("color"), Feature::new("target")];
    let encoded = enc.fit_transform(&df, &features, Some("target")).await?;
    let batches = encoded.collect().await?;
    let batch = batches.first().expect("Expected at least one batch");

    // red: (30 - 10) / 2 = 10; blue: (40 - 20) / 1 = 20;
    // green occurs once, so it falls back to the global mean 15.
    let expected = vec![10.0, 20.0, 10.0, 15.0, 20.0, 10.0];
    let actual = float64_column(batch, "COLOR_leave_one_out");
    for (i, (got, want)) in actual.iter().zip(&expected).enumerate() {
        assert!(
            approx::abs_diff_eq!(got, want, epsilon = 1e-9),
            "Row {}: expected {}, got {}",
            i,
            want,
            got
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_leave_one_out_out_of_sample_uses_plain_ratio() -> FeatureEncodingResult<()> {
    let df = create_categorical_df(true).await;
    let mut enc = Encoder::new("leave_one_out", Some(vec!["color".to_string()]))?;
    enc.fit(&df, &[Feature::new("color")], Some("target")).await?;

    // Out of sample there is no leakage concern: plain sum / count, with the
    // global mean for unseen values.
    let new_df = create_string_df(
        "color",
        vec![Some("red"), Some("blue"), Some("green"), Some("yellow"), None],
    )
    .await;
    let batches = enc.transform(new_df)?.collect().await?;
    let batch = batches.first().expect("Expected at least one batch");
    let expected = vec![10.0, 20.0, 30.0, 15.0, 15.0];
    let actual = float64_column(batch, "COLOR_leave_one_out");
    for (got, want) in actual.iter().zip(&expected) {
        assert!(approx::abs_diff_eq!(got, want, epsilon = 1e-9));
    }

    // Replay agrees with the out-of-sample batch path.
    let encoder = LeaveOneOutEnc::new(&enc, "color")?;
    let replayed = encoder.transform(&[
        Some("red"),
        Some("blue"),
        Some("green"),
        Some("yellow"),
        None,
    ]);
    for (got, want) in replayed[0].iter().zip(&expected) {
        assert!(approx::abs_diff_eq!(got, want, epsilon = 1e-9));
    }
    Ok(())
}

#[tokio::test]
async fn test_get_mapping_by_name_and_index() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let mut enc = Encoder::new("ordinal", None)?;
    enc.fit(&df, &base_features(), None).await?;

    let by_name = enc.get_mapping("countrycode")?;
    let by_index = enc.get_mapping(1_usize)?;
    assert_eq!(by_name, by_index);
    match by_name {
        ColumnMapping::Ordinal(mapping) => {
            assert_eq!(mapping.get("US"), Some(&1));
            assert_eq!(mapping.get("AL"), Some(&2));
        }
        other => panic!("Expected an ordinal mapping, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_binary_mapping_exposes_ordinal_substep() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let mut enc = Encoder::new("binary", Some(vec!["product_id".to_string()]))?;
    enc.fit(&df, &[Feature::new("product_id")], None).await?;

    match enc.get_mapping("product_id")? {
        ColumnMapping::Binary { binary, ordinal } => {
            assert_eq!(binary.n_bits(), 2);
            assert_eq!(ordinal.get("coke zero"), Some(&1));
            assert_eq!(binary.digits(2), vec![1, 0]);
        }
        other => panic!("Expected a binary mapping, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_hashing_has_no_mapping() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let mut enc = Encoder::new("hashing", Some(vec!["product_id".to_string()]))?;
    enc.fit(&df, &[Feature::new("product_id")], None).await?;
    assert!(matches!(
        enc.get_mapping("product_id"),
        Err(FeatureEncodingError::MethodMismatch(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_transform_before_fit_fails() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let enc = Encoder::new("ordinal", None)?;
    assert!(matches!(
        enc.transform(df),
        Err(FeatureEncodingError::FitNotCalled)
    ));
    Ok(())
}

#[tokio::test]
async fn test_fit_with_missing_configured_column_fails() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let mut enc = Encoder::new("ordinal", Some(vec!["nonexistent".to_string()]))?;
    let result = enc.fit(&df, &base_features(), None).await;
    assert!(matches!(
        result,
        Err(FeatureEncodingError::MissingColumn(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_transform_with_missing_base_column_fails() -> FeatureEncodingResult<()> {
    let df = create_feature_matrix().await;
    let mut enc = Encoder::new("ordinal", Some(vec!["product_id".to_string()]))?;
    enc.fit(&df, &[Feature::new("product_id")], None).await?;

    let other_df = create_string_df("color", vec![Some("red")]).await;
    assert!(matches!(
        enc.transform(other_df),
        Err(FeatureEncodingError::MissingColumn(_))
    ));
    Ok(())
}
