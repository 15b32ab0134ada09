use benchcmp_report::{
    format_report, generate_report, load_samples, run, Conclusion, KeyField, KpiDefinition,
    Preset, ReporterConfig, SampleTable,
};
use std::path::Path;

fn table(name: &str, csv: &str) -> SampleTable {
    SampleTable::from_reader(name, csv.as_bytes()).unwrap()
}

fn bw_config(higher_is_better: bool) -> ReporterConfig {
    ReporterConfig::new(
        vec![KeyField::new("cfg")],
        vec![KpiDefinition::new("BW", "bw", higher_is_better)],
    )
    .unwrap()
}

const BASE: &str = "cfg,bw\nA,100\nA,102\nA,98\n";
const TEST: &str = "cfg,bw\nA,130\nA,128\nA,132\n";

#[test]
fn test_end_to_end_major_improvement() {
    let report =
        generate_report(&table("base", BASE), &table("test", TEST), &bw_config(true)).unwrap();
    let formatted = format_report(&report);

    assert_eq!(formatted.cell(0, "cfg"), Some("A"));
    assert_eq!(formatted.cell(0, "BW-BASE-AVG"), Some("100.0"));
    assert_eq!(formatted.cell(0, "BW-TEST-AVG"), Some("130.0"));
    assert_eq!(formatted.cell(0, "BW-%DIFF"), Some("30.0"));
    assert_eq!(formatted.cell(0, "BW-BASE-%SD"), Some("2.0"));
    assert_eq!(formatted.cell(0, "BW-CONCLUSION"), Some("Major Improvement"));
}

#[test]
fn test_polarity_inversion() {
    let report =
        generate_report(&table("base", BASE), &table("test", TEST), &bw_config(false)).unwrap();
    assert_eq!(
        report.rows()[0].kpis[0].conclusion,
        Some(Conclusion::MajorRegression)
    );
}

#[test]
fn test_row_completeness_ignores_base_coverage() {
    let base = table("base", "cfg,bw\nA,1\nA,2\n");
    let test = table("test", "cfg,bw\nC,1\nA,1\nB,1\nC,2\nA,2\nB,3\n");
    let report = generate_report(&base, &test, &bw_config(true)).unwrap();

    assert_eq!(report.len(), 3);
    let conclusions: Vec<_> = report.rows().iter().map(|r| r.kpis[0].conclusion).collect();
    assert_eq!(conclusions[1], Some(Conclusion::DataInvalid));
    assert_eq!(conclusions[2], Some(Conclusion::DataInvalid));
}

#[test]
fn test_rows_sorted_by_declared_key_order() {
    let config = ReporterConfig::new(
        vec![KeyField::new("RW"), KeyField::new("BS")],
        vec![KpiDefinition::new("BW", "bw", true)],
    )
    .unwrap();
    let test = table(
        "test",
        "RW,BS,bw\nwrite,16,1\nread,128,1\nread,16,1\nwrite,4,1\nread,4,1\n",
    );
    let formatted = format_report(&generate_report(&test, &test, &config).unwrap());
    let keys: Vec<(String, String)> = formatted
        .rows
        .iter()
        .map(|r| (r[0].clone(), r[1].clone()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("read".into(), "4".into()),
            ("read".into(), "16".into()),
            ("read".into(), "128".into()),
            ("write".into(), "4".into()),
            ("write".into(), "16".into()),
        ]
    );
}

#[test]
fn test_single_base_sample_is_contained() {
    let base = table("base", "cfg,bw\nA,100\nB,10\nB,11\nB,10.5\n");
    let test = table("test", "cfg,bw\nA,130\nA,128\nA,132\nB,10\nB,11\nB,10.5\n");
    let report = generate_report(&base, &test, &bw_config(true)).unwrap();

    let a = report.rows()[0].kpis[0];
    assert!(a.base_pct_sd.is_nan());
    assert_eq!(a.conclusion, Some(Conclusion::DataInvalid));

    let b = report.rows()[1].kpis[0];
    assert_eq!(b.conclusion, Some(Conclusion::NoDifference));
}

#[test]
fn test_variance_gate_end_to_end() {
    // base %SD is 15, %DIFF is 50
    let base = table("base", "cfg,bw\nA,85\nA,100\nA,115\n");
    let test = table("test", "cfg,bw\nA,149\nA,150\nA,151\n");
    let report = generate_report(&base, &test, &bw_config(true)).unwrap();
    let cells = report.rows()[0].kpis[0];
    assert!((cells.base_pct_sd - 15.0).abs() < 1e-9);
    assert_eq!(cells.pct_diff, 50.0);
    assert_eq!(cells.conclusion, Some(Conclusion::VarianceTooLarge));
}

#[test]
fn test_numeric_keys_match_across_spellings() {
    let config = ReporterConfig::new(
        vec![KeyField::new("IODepth")],
        vec![KpiDefinition::new("BW", "bw", true)],
    )
    .unwrap();
    let base = table("base", "IODepth,bw\n1.0,100\n1.0,102\n1.0,98\n");
    let test = table("test", "IODepth,bw\n1,130\n1,128\n1,132\n");
    let report = generate_report(&base, &test, &config).unwrap();
    let formatted = format_report(&report);
    assert_eq!(formatted.cell(0, "IODepth"), Some("1"));
    assert_eq!(formatted.cell(0, "BW-CONCLUSION"), Some("Major Improvement"));
}

#[test]
fn test_schema_problems_are_data_source_errors() {
    let config = bw_config(true);
    let no_metric = table("base", "cfg,iops\nA,1\n");
    let err = generate_report(&no_metric, &table("test", TEST), &config).unwrap_err();
    assert!(err.is_data_source());
    assert!(err.to_string().contains("missing metric column \"bw\""));

    let text_metric = table("test", "cfg,bw\nA,fast\n");
    let err = generate_report(&table("base", BASE), &text_metric, &config).unwrap_err();
    assert!(err.to_string().contains("non-numeric"));
}

#[test]
fn test_storage_preset_pipeline_is_deterministic() {
    let header = "Backend,Driver,Format,RW,BS,IODepth,Numjobs,BW(MiB/s),IOPS,LAT(ms),Util(%)\n";
    let mut base = header.to_string();
    let mut test = header.to_string();
    for (i, rw) in ["randwrite", "read", "randread"].iter().enumerate() {
        for round in 0..3 {
            let jitter = round as f64;
            base.push_str(&format!(
                "NVMe,virtio_blk,xfs,{rw},4k,{},1,{},{},{},{}\n",
                i + 1,
                100.0 + jitter,
                25600.0 + jitter * 10.0,
                0.5 + jitter / 100.0,
                90.0 + jitter
            ));
            test.push_str(&format!(
                "NVMe,virtio_blk,xfs,{rw},4k,{},1,{},{},{},{}\n",
                i + 1,
                90.0 + jitter,
                24600.0 + jitter * 10.0,
                0.52 + jitter / 100.0,
                90.0 + jitter
            ));
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let base_path = dir.path().join("base.csv");
    let test_path = dir.path().join("test.csv");
    std::fs::write(&base_path, base).unwrap();
    std::fs::write(&test_path, test).unwrap();

    let config = ReporterConfig::preset(Preset::Storage);
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    let summary = run(&base_path, &test_path, &first, &config).unwrap();
    run(&base_path, &test_path, &second, &config).unwrap();

    let first = std::fs::read(first).unwrap();
    assert_eq!(first, std::fs::read(second).unwrap());

    let text = String::from_utf8(first).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Backend,Driver,Format,RW,BS,IODepth,Numjobs,BW-BASE-AVG,"));
    assert!(lines[0].ends_with("Util-SIGN,Util-CONCLUSION"));
    assert!(lines[1].contains(",randread,"));
    assert!(lines[3].contains(",read,"));

    assert_eq!(summary.groups, 3);
    assert_eq!(summary.count("BW", Conclusion::MajorRegression), 3);
    assert_eq!(summary.count("Util", Conclusion::NoDifference), 3);
}

#[test]
fn test_load_samples_fails_on_missing_source() {
    let err = load_samples(Path::new("/nonexistent/base.csv"), Path::new("/nonexistent/test.csv"))
        .unwrap_err();
    assert!(err.is_data_source());
}
