use std::path::Path;

use subcategorize::filter::CountryMatcher;
use subcategorize::models::TableError;
use subcategorize::CountryTable;

#[cfg(test)]
mod country_table_tests {
    use super::*;

    fn default_table() -> CountryTable {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("base/countries.toml");
        CountryTable::load(&path).unwrap()
    }

    #[test]
    fn test_default_table_loads() {
        let table = default_table();
        assert!(table.len() > 40);

        let germany = table.get("DE").unwrap();
        assert_eq!(germany.name, "Germany");
        assert_eq!(germany.flag.as_deref(), Some("🇩🇪"));
        assert_eq!(germany.native_name.as_deref(), Some("آلمان"));
        assert!(table.get("GB").is_some());
        assert!(table.get("UA").is_some());
    }

    #[test]
    fn test_default_table_matching() {
        let matcher = CountryMatcher::new(&default_table());

        assert_eq!(matcher.match_remark("DE-Frankfurt-01"), vec!["DE"]);
        assert_eq!(matcher.match_remark("Ukraine-Node-3"), vec!["UA"]);
        assert_eq!(matcher.match_remark("🇬🇧 London"), vec!["GB"]);
        assert_eq!(matcher.match_remark("سرور آلمان"), vec!["DE"]);
        // Common words that happen to be country codes
        assert!(matcher.match_remark("Join in now, it is free").is_empty());
    }

    #[test]
    fn test_yaml_table() {
        let yaml_content = r#"
countries:
  - code: "NL"
    name: "Netherlands"
    aliases: ["NL", "Amsterdam"]
    flag: "🇳🇱"
  - name: "Atlantis"
"#;
        let table = CountryTable::from_content(yaml_content, "yaml").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].code, "NL");
        // Code falls back to the name
        assert_eq!(table.entries()[1].code, "Atlantis");
    }

    #[test]
    fn test_legacy_keyword_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.json");
        std::fs::write(
            &path,
            r#"{
                "Vmess": ["vmess"],
                "Germany": ["Germany", "DE", "آلمان", "🇩🇪"],
                "Iran": ["Iran", "IR", "ایران", "🇮🇷"]
            }"#,
        )
        .unwrap();

        let table = CountryTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);

        let germany = table.get("DE").unwrap();
        assert_eq!(germany.name, "Germany");
        assert_eq!(germany.flag.as_deref(), Some("🇩🇪"));
        assert!(germany.aliases.iter().any(|a| a == "آلمان"));
        assert!(table.get("IR").is_some());
    }

    #[test]
    fn test_table_errors() {
        assert!(matches!(
            CountryTable::from_content("countries = []", "toml"),
            Err(TableError::Empty)
        ));
        let duplicated = r#"
[[countries]]
code = "DE"
name = "Germany"

[[countries]]
code = "DE"
name = "Deutschland"
"#;
        assert!(matches!(
            CountryTable::from_content(duplicated, "toml"),
            Err(TableError::DuplicateCode(code)) if code == "DE"
        ));
        assert!(matches!(
            CountryTable::load(Path::new("/nonexistent/countries.toml")),
            Err(TableError::Io { .. })
        ));
    }
}
