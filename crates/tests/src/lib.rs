//! # Integration Tests
//!
//! End-to-end tests over captured MegaCli output.
//!
//! Covers:
//! - Golden parse of the three fixture reports
//! - Collector -> TsdbSink -> mock transport (batching, failover)
//! - Collector -> TsdbSink -> loopback HTTP server

#[cfg(test)]
mod fixtures {
    pub const PHYSICAL: &str = include_str!("../fixtures/physical.txt");
    pub const VIRTUAL: &str = include_str!("../fixtures/virtual.txt");
    pub const BBU: &str = include_str!("../fixtures/bbu.txt");

    /// Every metric the three fixtures must produce, and nothing else
    pub const GOLDEN: [(&str, i64); 100] = [
        ("pd.adapter0.phy0.media_errors", 60),
        ("pd.adapter0.phy0.other_errors", 1),
        ("pd.adapter0.phy0.predictive_failures", 0),
        ("pd.adapter0.phy0.temperature", 32),
        ("pd.adapter0.phy0.smart_alert", 0),
        ("pd.adapter0.phy1.media_errors", 3),
        ("pd.adapter0.phy1.other_errors", 0),
        ("pd.adapter0.phy1.predictive_failures", 0),
        ("pd.adapter0.phy1.temperature", 37),
        ("pd.adapter0.phy1.smart_alert", 0),
        ("pd.adapter0.phy2.media_errors", 21),
        ("pd.adapter0.phy2.other_errors", 0),
        ("pd.adapter0.phy2.predictive_failures", 0),
        ("pd.adapter0.phy2.temperature", 36),
        ("pd.adapter0.phy2.smart_alert", 0),
        ("pd.adapter0.phy3.media_errors", 21),
        ("pd.adapter0.phy3.other_errors", 0),
        ("pd.adapter0.phy3.predictive_failures", 0),
        ("pd.adapter0.phy3.temperature", 33),
        ("pd.adapter0.phy3.smart_alert", 0),
        ("pd.adapter0.phy4.media_errors", 5),
        ("pd.adapter0.phy4.other_errors", 1),
        ("pd.adapter0.phy4.predictive_failures", 0),
        ("pd.adapter0.phy4.temperature", 37),
        ("pd.adapter0.phy4.smart_alert", 0),
        ("pd.adapter0.phy5.media_errors", 28),
        ("pd.adapter0.phy5.other_errors", 0),
        ("pd.adapter0.phy5.predictive_failures", 0),
        ("pd.adapter0.phy5.temperature", 35),
        ("pd.adapter0.phy5.smart_alert", 1),
        ("vd.adapter0.virt0.raid_level", 1),
        ("vd.adapter0.virt0.state_optimal", 1),
        ("vd.adapter0.virt0.drives", 2),
        ("vd.adapter0.virt0.cache_policy_default", 1),
        ("vd.adapter0.virt0.bad_blocks", 0),
        ("vd.adapter0.virt1.raid_level", 0),
        ("vd.adapter0.virt1.state_optimal", 1),
        ("vd.adapter0.virt1.drives", 1),
        ("vd.adapter0.virt1.cache_policy_default", 1),
        ("vd.adapter0.virt1.bad_blocks", 1),
        ("vd.adapter0.virt2.raid_level", 0),
        ("vd.adapter0.virt2.state_optimal", 1),
        ("vd.adapter0.virt2.drives", 1),
        ("vd.adapter0.virt2.cache_policy_default", 1),
        ("vd.adapter0.virt2.bad_blocks", 0),
        ("vd.adapter0.virt3.raid_level", 0),
        ("vd.adapter0.virt3.state_optimal", 1),
        ("vd.adapter0.virt3.drives", 1),
        ("vd.adapter0.virt3.cache_policy_default", 1),
        ("vd.adapter0.virt3.bad_blocks", 1),
        ("vd.adapter0.virt4.raid_level", 0),
        ("vd.adapter0.virt4.state_optimal", 1),
        ("vd.adapter0.virt4.drives", 1),
        ("vd.adapter0.virt4.cache_policy_default", 1),
        ("vd.adapter0.virt4.bad_blocks", 0),
        ("vd.adapter0.virt5.raid_level", 0),
        ("vd.adapter0.virt5.state_optimal", 1),
        ("vd.adapter0.virt5.drives", 1),
        ("vd.adapter0.virt5.cache_policy_default", 0),
        ("vd.adapter0.virt5.bad_blocks", 0),
        ("bbu.adapter0.voltage", 4073),
        ("bbu.adapter0.current", 0),
        ("bbu.adapter0.temperature", 27),
        ("bbu.adapter0.fw.voltage", 1),
        ("bbu.adapter0.fw.temperature", 1),
        ("bbu.adapter0.fw.learn_cycle_requested", 0),
        ("bbu.adapter0.fw.learn_cycle_active", 0),
        ("bbu.adapter0.fw.learn_cycle_status", 1),
        ("bbu.adapter0.fw.learn_cycle_timeout", 0),
        ("bbu.adapter0.fw.i2c_errors_detected", 0),
        ("bbu.adapter0.fw.battery_pack_missing", 0),
        ("bbu.adapter0.fw.battery_replacement_required", 0),
        ("bbu.adapter0.fw.remaining_capacity_low", 0),
        ("bbu.adapter0.fw.periodic_learn_required", 0),
        ("bbu.adapter0.fw.transparent_learn", 0),
        ("bbu.adapter0.fw.no_space_to_cache_offload", 0),
        ("bbu.adapter0.fw.pack_is_about_to_fail", 0),
        ("bbu.adapter0.fw.cache_offload_premium_feature_required", 0),
        ("bbu.adapter0.fw.module_microcode_update_required", 0),
        ("bbu.adapter0.gasgauge.fully_discharged", 0),
        ("bbu.adapter0.gasgauge.fully_charged", 1),
        ("bbu.adapter0.gasgauge.discharging", 1),
        ("bbu.adapter0.gasgauge.initialized", 1),
        ("bbu.adapter0.gasgauge.remaining_time_alarm", 0),
        ("bbu.adapter0.gasgauge.discharge_terminated", 0),
        ("bbu.adapter0.gasgauge.over_temperature", 0),
        ("bbu.adapter0.gasgauge.charging_terminated", 1),
        ("bbu.adapter0.gasgauge.over_charged", 0),
        ("bbu.adapter0.relative_state_of_charge", 100),
        ("bbu.adapter0.remaining_capacity", 1559),
        ("bbu.adapter0.full_charge_capacity", 1559),
        ("bbu.adapter0.issohgood", 1),
        ("bbu.adapter0.gasgauge.battery_backup_charge_time", 0),
        ("bbu.adapter0.capacity.relative_state_of_charge", 100),
        ("bbu.adapter0.capacity.absolute_state_of_charge", 87),
        ("bbu.adapter0.capacity.remaining_capacity", 1559),
        ("bbu.adapter0.capacity.full_charge_capacity", 1559),
        ("bbu.adapter0.capacity.cycle_count", 44),
        ("bbu.adapter0.design.design_capacity", 1800),
        ("bbu.adapter0.design.design_voltage", 3700),
    ];

    pub fn runner() -> collector::StaticCommandRunner {
        use collector::ReportKind;

        collector::StaticCommandRunner::new()
            .with_output(ReportKind::Physical, PHYSICAL)
            .with_output(ReportKind::Virtual, VIRTUAL)
            .with_output(ReportKind::Bbu, BBU)
    }
}

#[cfg(test)]
mod golden_tests {
    use std::collections::BTreeMap;

    use collector::parsers::{parse_bbu, parse_physical, parse_virtual};

    use super::fixtures::*;

    #[test]
    fn test_fixtures_match_golden_mapping() {
        let mut parsed = parse_physical(PHYSICAL).unwrap();
        parsed.extend(parse_virtual(VIRTUAL).unwrap());
        parsed.extend(parse_bbu(BBU).unwrap());

        let expected: BTreeMap<String, i64> = GOLDEN
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();

        let missing: Vec<_> = expected.keys().filter(|k| !parsed.contains_key(*k)).collect();
        let extra: Vec<_> = parsed.keys().filter(|k| !expected.contains_key(*k)).collect();
        assert!(missing.is_empty(), "missing: {missing:?}");
        assert!(extra.is_empty(), "unexpected: {extra:?}");
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_per_report_counts() {
        assert_eq!(parse_physical(PHYSICAL).unwrap().len(), 30);
        assert_eq!(parse_virtual(VIRTUAL).unwrap().len(), 30);
        assert_eq!(parse_bbu(BBU).unwrap().len(), 40);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use collector::{MegaRaidCollector, ReportKind, StaticCommandRunner};
    use contracts::{MetricSink, TsdbHandlerConfig};
    use dispatcher::{LogSink, MockTransport, TsdbSink};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::time::timeout;

    use super::fixtures::{runner, GOLDEN, PHYSICAL};

    fn handler(servers: &[&str], batchsize: usize) -> TsdbHandlerConfig {
        TsdbHandlerConfig {
            servers: servers.iter().map(|s| s.to_string()).collect(),
            batchsize,
            ..Default::default()
        }
    }

    fn collector(runner: StaticCommandRunner) -> MegaRaidCollector<StaticCommandRunner> {
        MegaRaidCollector::new(Default::default(), runner, "servers", "web01")
    }

    /// Golden names in publish order: physical, virtual, bbu, each sorted
    fn expected_metrics() -> Vec<String> {
        let mut by_report: BTreeMap<ReportKind, Vec<String>> = BTreeMap::new();
        for (name, _) in GOLDEN {
            let kind = match &name[..2] {
                "pd" => ReportKind::Physical,
                "vd" => ReportKind::Virtual,
                _ => ReportKind::Bbu,
            };
            by_report.entry(kind).or_default().push(format!("megaraid.{name}"));
        }
        by_report
            .into_values()
            .flat_map(|mut names| {
                names.sort();
                names
            })
            .collect()
    }

    /// End-to-end: StaticCommandRunner -> MegaRaidCollector -> TsdbSink -> MockTransport
    ///
    /// 100 facts with batchsize 10 go out as exactly 10 full batches, in
    /// publish order, with the hostname tag on every point.
    #[tokio::test]
    async fn test_e2e_full_cycle_batches() {
        let mock = MockTransport::new();
        let mut sink = TsdbSink::with_transport(&handler(&["tsdb1:4242"], 10), mock.clone()).unwrap();
        let collector = collector(runner());

        let report = timeout(Duration::from_secs(5), collector.collect(&mut sink))
            .await
            .expect("collection timed out");
        assert!(report.is_success(), "failures: {:?}", report.failures);
        assert_eq!(report.total_published(), 100);

        sink.close().await.unwrap();

        let delivered = mock.delivered();
        assert_eq!(delivered.len(), 10);
        assert!(delivered.iter().all(|r| r.points.len() == 10));
        assert!(delivered.iter().all(|r| r.endpoint == "http://tsdb1:4242/api/put"));

        let metrics: Vec<String> = delivered
            .iter()
            .flat_map(|r| r.points.iter().map(|p| p.metric.clone()))
            .collect();
        assert_eq!(metrics, expected_metrics());

        let points: Vec<_> = delivered.iter().flat_map(|r| r.points.iter()).collect();
        assert!(points.iter().all(|p| p.tags.get("hostname") == Some("web01")));
        assert!(points.iter().all(|p| p.timestamp == report.timestamp));

        let snap = sink.metrics().snapshot();
        assert_eq!(snap.batches_delivered, 10);
        assert_eq!(snap.points_sent, 100);
        assert_eq!(snap.batches_dropped, 0);
        assert_eq!(mock.close_count(), 1);
    }

    #[tokio::test]
    async fn test_e2e_failover_delivers_everything() {
        let mock = MockTransport::new();
        mock.fail_endpoint("http://down:4242/api/put");
        let config = handler(&["down:4242", "up:4242"], 25);
        let mut sink = TsdbSink::with_transport(&config, mock.clone()).unwrap();

        let report = collector(runner()).collect(&mut sink).await;
        sink.close().await.unwrap();

        assert!(report.is_success());
        let delivered = mock.delivered();
        assert_eq!(delivered.len(), 4);
        assert!(delivered.iter().all(|r| r.endpoint == "http://up:4242/api/put"));
        assert_eq!(delivered.iter().map(|r| r.points.len()).sum::<usize>(), 100);

        // The primary is random; a failed attempt only happens when it is `down`.
        let snap = sink.metrics().snapshot();
        assert!(snap.transport_failures == 0 || snap.transport_failures == 4);
        assert_eq!(snap.batches_dropped, 0);
    }

    #[tokio::test]
    async fn test_e2e_all_servers_down_drops_without_failing_cycle() {
        let mock = MockTransport::new();
        mock.fail_endpoint("http://a:4242/api/put")
            .fail_endpoint("http://b:4242/api/put");
        let mut sink = TsdbSink::with_transport(&handler(&["a:4242", "b:4242"], 50), mock.clone()).unwrap();

        let report = collector(runner()).collect(&mut sink).await;
        sink.close().await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.publish_errors, 0);
        assert!(mock.delivered().is_empty());
        // Two batches, each tried once per server.
        assert_eq!(mock.requests().len(), 4);

        let snap = sink.metrics().snapshot();
        assert_eq!(snap.batches_dropped, 2);
        assert_eq!(snap.points_dropped, 100);
    }

    #[tokio::test]
    async fn test_e2e_report_isolation() {
        let runner = StaticCommandRunner::new()
            .with_output(ReportKind::Physical, PHYSICAL)
            .with_output(ReportKind::Virtual, "Adapter X -- Virtual Drive Information:\n")
            .with_failure(ReportKind::Bbu, "exit status 1");
        let mut sink = LogSink::capturing("capture");

        let collector = collector(runner);
        let report = collector.collect(&mut sink).await;

        assert_eq!(report.published.get(&ReportKind::Physical), Some(&30));
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures.iter().any(|f| f.kind == ReportKind::Virtual && f.parse_error));
        assert!(report.failures.iter().any(|f| f.kind == ReportKind::Bbu && !f.parse_error));

        let points = sink.take_points();
        assert_eq!(points.len(), 30);
        assert!(points
            .iter()
            .all(|p| p.path.starts_with("servers.web01.megaraid.pd.adapter0.")));

        let snap = collector.metrics().snapshot();
        assert_eq!(snap.parse_errors, 1);
        assert_eq!(snap.execution_errors, 1);
        assert_eq!(snap.points_published, 30);
    }

    #[tokio::test]
    async fn test_e2e_config_tags_and_patterns() {
        let toml = r#"
            hostname = "db1"
            path_prefix = "servers"

            [handler]
            servers = ["tsdb1:4242"]
            batchsize = 100
            tags = ["dc=eu"]
            tagsinmetric = ['megaraid\.pd\.(?P<adapter>adapter\d+)\.(?P<disk>phy\d+)\.']
        "#;
        let agent = config_loader::ConfigLoader::load_from_str(toml, config_loader::ConfigFormat::Toml).unwrap();
        config_loader::ConfigLoader::validate(&agent).unwrap();

        let mock = MockTransport::new();
        let mut sink = TsdbSink::with_transport(&agent.handler, mock.clone()).unwrap();
        let host = agent.hostname.clone().unwrap();
        let collector = MegaRaidCollector::new(agent.collector.clone(), runner(), &agent.path_prefix, host);

        collector.collect(&mut sink).await;
        sink.close().await.unwrap();

        let delivered = mock.delivered();
        assert_eq!(delivered.len(), 1);
        let points = &delivered[0].points;
        assert_eq!(points.len(), 100);

        let media = points
            .iter()
            .find(|p| p.metric == "megaraid.pd.media_errors" && p.tags.get("disk") == Some("phy0"))
            .expect("phy0 media errors");
        assert_eq!(media.value, 60);
        assert_eq!(media.tags.get("adapter"), Some("adapter0"));
        assert_eq!(media.tags.get("dc"), Some("eu"));
        assert_eq!(media.tags.get("hostname"), Some("db1"));

        let bbu = points
            .iter()
            .find(|p| p.metric == "megaraid.bbu.adapter0.voltage")
            .expect("bbu voltage");
        assert_eq!(bbu.value, 4073);
        assert_eq!(bbu.tags.get("adapter"), None);
    }

    /// Minimal `/api/put` server: answers 204 and reports how many points
    /// each request carried
    async fn tsdb_server(listener: TcpListener, requests: usize) -> Vec<usize> {
        let mut counts = Vec::with_capacity(requests);
        for _ in 0..requests {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 8192];
            let body = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).into_owned();
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .filter_map(|l| l.split_once(':'))
                        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= head_end + 4 + content_length {
                        break buf[head_end + 4..].to_vec();
                    }
                }
                assert!(n > 0, "client hung up mid-request");
            };

            let points: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
            counts.push(points.len());
            socket
                .write_all(b"HTTP/1.1 204 No Content\r\nconnection: close\r\n\r\n")
                .await
                .unwrap();
        }
        counts
    }

    #[tokio::test]
    async fn test_e2e_http_delivery() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(tsdb_server(listener, 3));

        let config = TsdbHandlerConfig {
            servers: vec![addr.to_string()],
            batchsize: 40,
            timeout: 5,
            ..Default::default()
        };
        let mut sink = TsdbSink::from_config(&config).unwrap();

        let report = timeout(Duration::from_secs(10), collector(runner()).collect(&mut sink))
            .await
            .expect("collection timed out");
        sink.close().await.unwrap();

        assert!(report.is_success());
        let counts = timeout(Duration::from_secs(5), server)
            .await
            .expect("server timed out")
            .unwrap();
        assert_eq!(counts, vec![40, 40, 20]);

        let snap = sink.metrics().snapshot();
        assert_eq!(snap.batches_delivered, 3);
        assert_eq!(snap.points_sent, 100);
    }
}
