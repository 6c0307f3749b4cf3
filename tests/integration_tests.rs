use ipgeo::{
    find_region, load_table, load_table_report, sort_ranges, GeoError, IpRange, RangeTable,
};
use std::fs;
use std::io::Write;
use tempfile::TempDir;

fn write_table(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_end_to_end_ho_chi_minh() {
    let dir = TempDir::new().unwrap();
    let path = write_table(
        &dir,
        "db1.csv",
        "1906389504,1906389759,VN,Ho Chi Minh City\n",
    );

    let mut ranges = load_table(&path).unwrap();
    sort_ranges(&mut ranges);

    assert_eq!(
        find_region(&ranges, "113.161.50.126").unwrap(),
        ("VN".to_string(), "Ho Chi Minh City".to_string())
    );
}

#[test]
fn test_unsorted_file_resolves_after_sort() {
    let dir = TempDir::new().unwrap();
    let path = write_table(
        &dir,
        "db1.csv",
        "300,400,CA,B\n100,200,US,A\n",
    );

    let table = RangeTable::from_ranges(load_table(&path).unwrap());

    let lookup = |q: &str| table.find_region(q);
    assert_eq!(lookup("0.0.0.150"), Ok(("US".into(), "A".into())));
    assert_eq!(lookup("0.0.0.200"), Ok(("US".into(), "A".into())));
    assert_eq!(lookup("0.0.1.44"), Ok(("CA".into(), "B".into()))); // 300
    assert_eq!(lookup("0.0.0.250"), Err(GeoError::NotFound("0.0.0.250".into())));
    assert_eq!(lookup("0.0.0.50"), Err(GeoError::NotFound("0.0.0.50".into())));
}

#[test]
fn test_malformed_rows_counted_not_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_table(
        &dir,
        "db1.csv",
        "\"ip_from\",\"ip_to\",\"country_code\",\"country_name\"\n\
         \"0\",\"16777215\",\"-\",\"-\"\n\
         \"16777216\",\"16777471\",\"US\"\n\
         \"16777472\",\"16778239\",\"CN\",\"China\"\n",
    );

    let report = load_table_report(&path).unwrap();
    assert_eq!(report.ranges.len(), 2);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.ranges[1], IpRange::new(16777472, 16778239, "CN", "China"));
}

#[test]
fn test_gzip_table() {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db1.csv.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    writeln!(encoder, "1906389504,1906389759,VN,Ho Chi Minh City").unwrap();
    fs::write(&path, encoder.finish().unwrap()).unwrap();

    let table = RangeTable::from_ranges(load_table(&path).unwrap());
    assert_eq!(table.lookup("113.161.50.126").unwrap().country_code, "VN");
}

#[test]
fn test_missing_table() {
    let dir = TempDir::new().unwrap();
    let err = load_table(dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, GeoError::Io(_)));
    assert!(err.is_input_error());
}

#[test]
fn test_codec_errors_propagate_through_lookup() {
    let table = RangeTable::from_ranges(vec![IpRange::new(0, u32::MAX, "ZZ", "Everywhere")]);
    assert_eq!(
        table.lookup("999.1.1.1").unwrap_err(),
        GeoError::InvalidAddress("999.1.1.1".into())
    );
    assert_eq!(table.lookup("::1").unwrap_err(), GeoError::NotIpv4("::1".into()));
}

#[test]
fn test_proxy_table_membership() {
    let dir = TempDir::new().unwrap();
    let path = write_table(
        &dir,
        "px1.csv",
        "1760346880,1760347135,US,United States of America\n",
    );

    let proxies = RangeTable::from_ranges(load_table(&path).unwrap());
    assert!(proxies.contains(ipgeo::parse_ipv4("104.236.195.1").unwrap()));
    assert!(!proxies.contains(ipgeo::parse_ipv4("104.244.73.112").unwrap()));
}
