use std::fs;

use subcategorize::generator::write_artifacts;
use subcategorize::parser::split_records;
use subcategorize::pipeline::dedup;
use subcategorize::settings::{FilterSettings, ReportSettings};
use subcategorize::utils::base64::{base64_encode, url_safe_base64_encode};
use subcategorize::{CancelToken, CountryEntry, CountryTable, Pipeline, ProxyType};

#[cfg(test)]
mod pipeline_tests {
    use super::*;

    fn table() -> CountryTable {
        CountryTable::new(vec![
            CountryEntry::new("DE", "Germany", &["DE", "Deutschland", "🇩🇪"], Some("🇩🇪")),
            CountryEntry::new("GB", "United Kingdom", &["UK", "GB"], Some("🇬🇧")),
            CountryEntry::new("UA", "Ukraine", &["UA"], Some("🇺🇦")),
            CountryEntry::new("US", "United States", &["US", "USA"], Some("🇺🇸")),
        ])
        .unwrap()
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(&table(), &FilterSettings::default(), 4).unwrap()
    }

    fn vmess(ps: &str, host: &str) -> String {
        format!(
            "vmess://{}",
            base64_encode(&format!(
                r#"{{"v":"2","ps":"{}","add":"{}","port":"443","id":"a3482e88-686a-4a58-8126-99c9df64b7bf","aid":"0","net":"tcp","tls":""}}"#,
                ps, host
            ))
        )
    }

    fn ssr(host: &str, remarks: &str) -> String {
        let body = format!(
            "{}:8388:origin:aes-256-cfb:plain:{}/?remarks={}",
            host,
            url_safe_base64_encode("pw"),
            url_safe_base64_encode(remarks)
        );
        format!("ssr://{}", url_safe_base64_encode(&body))
    }

    fn sample_batch() -> Vec<String> {
        vec![
            vmess("DE-Frankfurt-01", "1.2.3.4"),
            "trojan://secret@uk.example.com:443?sni=a.com#Ukraine-Node-3".to_string(),
            "vless://id@us.example.com:443?type=ws#US%20%2F%20DE%20relay".to_string(),
            "vless://id@US.example.com:443?type=ws#another%20name".to_string(),
            ssr("5.6.7.8", "United Kingdom 2"),
            "hysteria2://auth@hy.example.com:8443#%F0%9F%87%A9%F0%9F%87%AA ".to_string(),
            "tuic://uuid:pw@tuic.example.com:443#Free%20Node".to_string(),
            "ss://YWVzLTI1Ni1nY206cHc@ss.example.com:8388#I_Love_Spam".to_string(),
            "vmess://not-base64-$$$".to_string(),
            "http://not-a-proxy".to_string(),
        ]
    }

    #[test]
    fn test_vmess_example_classified_as_germany() {
        let lines = vec![vmess("DE-Frankfurt-01", "1.2.3.4")];
        let output = pipeline().run(&lines, &CancelToken::new()).unwrap();

        let record = &output.records[0];
        assert_eq!(record.protocol, ProxyType::Vmess);
        assert_eq!(record.remark.as_deref(), Some("DE-Frankfurt-01"));
        assert_eq!(record.matched_countries, vec!["DE"]);
        assert_eq!(output.aggregate.protocol(ProxyType::Vmess).unwrap().len(), 1);
        assert_eq!(output.aggregate.country("DE").unwrap().len(), 1);
    }

    #[test]
    fn test_ukraine_does_not_match_uk() {
        let lines = vec!["trojan://secret@h.example.com:443#Ukraine-Node-3".to_string()];
        let output = pipeline().run(&lines, &CancelToken::new()).unwrap();
        assert_eq!(output.records[0].matched_countries, vec!["UA"]);
        assert!(output.aggregate.country("GB").is_none());
    }

    #[test]
    fn test_longer_country_name_does_not_trigger_short_alias() {
        let lines = vec!["trojan://secret@h.example.com:443#United%20Kingdom".to_string()];
        let output = pipeline().run(&lines, &CancelToken::new()).unwrap();
        // "United Kingdom" shares no bounded token with "United States" / "US"
        assert_eq!(output.records[0].matched_countries, vec!["GB"]);
    }

    #[test]
    fn test_fragment_only_difference_collapses() {
        let lines = vec![
            "vless://id@host.example.com:443?security=tls#Name%20One".to_string(),
            "vless://id@host.example.com:443?security=tls#Name%20Two".to_string(),
        ];
        let output = pipeline().run(&lines, &CancelToken::new()).unwrap();
        assert_eq!(output.stats.duplicates, 1);
        assert_eq!(output.records.len(), 1);
        assert_eq!(&*output.records[0].raw_link, lines[0]);
    }

    #[test]
    fn test_credentials_and_query_keep_records_apart() {
        let lines = vec![
            "trojan://one@host.example.com:443?sni=a.com#x".to_string(),
            "trojan://two@host.example.com:443?sni=a.com#x".to_string(),
            "trojan://one@host.example.com:443?sni=b.com#x".to_string(),
        ];
        let output = pipeline().run(&lines, &CancelToken::new()).unwrap();
        assert_eq!(output.stats.duplicates, 0);
        assert_eq!(output.records.len(), 3);
    }

    #[test]
    fn test_two_country_record_fans_out() {
        let output = pipeline().run(&sample_batch(), &CancelToken::new()).unwrap();
        let relay = "vless://id@us.example.com:443?type=ws#US%20%2F%20DE%20relay";

        let de: Vec<&str> = output.aggregate.country("DE").unwrap().links().collect();
        let us: Vec<&str> = output.aggregate.country("US").unwrap().links().collect();
        let vless: Vec<&str> = output
            .aggregate
            .protocol(ProxyType::Vless)
            .unwrap()
            .links()
            .collect();

        assert!(de.contains(&relay));
        assert!(us.contains(&relay));
        assert_eq!(vless.iter().filter(|l| **l == relay).count(), 1);
        // The renamed duplicate of the relay never shows up
        assert_eq!(vless.len(), 1);
    }

    #[test]
    fn test_sample_batch_accounting() {
        let output = pipeline().run(&sample_batch(), &CancelToken::new()).unwrap();
        let stats = &output.stats;

        assert_eq!(stats.input, 10);
        assert_eq!(stats.decode_failed, 2);
        assert_eq!(stats.decode_errors["invalid_base64"], 1);
        assert_eq!(stats.decode_errors["unknown_scheme"], 1);
        assert_eq!(stats.filter_rules["deny_pattern"], 1);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.retained, 6);
        // "Free Node" matches nothing
        assert_eq!(stats.no_country, 1);
        assert_eq!(stats.input, stats.dropped() + stats.retained);

        assert_eq!(
            output.aggregate.country("GB").unwrap().links().collect::<Vec<_>>(),
            vec![ssr("5.6.7.8", "United Kingdom 2")]
        );
    }

    #[test]
    fn test_dedup_is_idempotent_on_pipeline_output() {
        let output = pipeline().run(&sample_batch(), &CancelToken::new()).unwrap();
        let (again, dropped) = dedup(output.records.clone());
        assert_eq!(dropped, 0);
        assert_eq!(again, output.records);
    }

    #[test]
    fn test_artifacts_are_byte_exact_and_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let out_a = dir.path().join("a");
        let out_b = dir.path().join("b");
        let batch = sample_batch();

        for out in [&out_a, &out_b] {
            let output = pipeline().run(&batch, &CancelToken::new()).unwrap();
            write_artifacts(out, &output, &table(), &ReportSettings::default()).unwrap();
        }

        let mut names: Vec<String> = fs::read_dir(&out_a)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "Germany.txt",
                "Hysteria2.txt",
                "README.md",
                "ShadowSocksR.txt",
                "Trojan.txt",
                "Tuic.txt",
                "Ukraine.txt",
                "United Kingdom.txt",
                "United States.txt",
                "Vless.txt",
                "Vmess.txt",
                "summary.json",
            ]
        );

        for name in &names {
            assert_eq!(
                fs::read(out_a.join(name)).unwrap(),
                fs::read(out_b.join(name)).unwrap(),
                "{} differs between runs",
                name
            );
        }

        // Trailing space in the hysteria2 line survives untouched
        let hysteria = fs::read_to_string(out_a.join("Hysteria2.txt")).unwrap();
        assert_eq!(
            hysteria,
            "hysteria2://auth@hy.example.com:8443#%F0%9F%87%A9%F0%9F%87%AA \n"
        );
        let germany = fs::read_to_string(out_a.join("Germany.txt")).unwrap();
        assert_eq!(
            germany,
            format!(
                "{}\nvless://id@us.example.com:443?type=ws#US%20%2F%20DE%20relay\nhysteria2://auth@hy.example.com:8443#%F0%9F%87%A9%F0%9F%87%AA \n",
                vmess("DE-Frankfurt-01", "1.2.3.4")
            )
        );

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out_a.join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["stats"]["retained"], 6);
        assert_eq!(summary["countries"][0]["name"], "Germany");
        assert_eq!(summary["countries"][0]["count"], 3);
    }

    #[test]
    fn test_rewrite_replaces_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("configs");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("Stale.txt"), "old").unwrap();

        let lines = vec!["trojan://pw@h.example.com:443#DE".to_string()];
        let output = pipeline().run(&lines, &CancelToken::new()).unwrap();
        write_artifacts(&out, &output, &table(), &ReportSettings::default()).unwrap();

        assert!(!out.join("Stale.txt").exists());
        assert!(out.join("Trojan.txt").exists());
        assert!(!dir.path().join(".configs.staging").exists());
    }

    #[test]
    fn test_split_then_run_keeps_wireguard_block_whole() {
        let content = "trojan://pw@h.example.com:443#US\n\
                       [Interface]\n\
                       PrivateKey = cHJpdmF0ZQ==\n\
                       Address = 10.0.0.2/32\n\
                       [Peer]\n\
                       PublicKey = cHVibGlj\n\
                       Endpoint = 162.159.192.1:2408\n";
        let lines = split_records(content);
        assert_eq!(lines.len(), 2);

        let output = pipeline().run(&lines, &CancelToken::new()).unwrap();
        let wireguard = output.aggregate.protocol(ProxyType::WireGuard).unwrap();
        assert_eq!(wireguard.links().next().unwrap(), lines[1]);
        assert_eq!(output.stats.unnamed, 1);
    }
}
