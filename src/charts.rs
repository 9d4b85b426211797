//! Chart render state
//!
//! Each chart holds a label set and a dataset of equal length. Updates replace
//! both together; painting happens in `ui::widgets`.

use crate::model::ChartPoint;

/// Labels and values, always the same length
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartData {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl ChartData {
    pub fn from_points<L: Into<String>>(points: impl IntoIterator<Item = (L, f64)>) -> Self {
        let (labels, values) = points
            .into_iter()
            .map(|(label, value)| (label.into(), value))
            .unzip();
        Self { labels, values }
    }

    /// Swap in a new dataset
    pub fn replace<L: Into<String>>(&mut self, points: impl IntoIterator<Item = (L, f64)>) {
        *self = Self::from_points(points);
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}

/// Two-slice used/free proportion chart
#[derive(Clone, Debug, PartialEq)]
pub struct GaugeChart {
    pub title: &'static str,
    data: ChartData,
}

impl GaugeChart {
    fn new(title: &'static str) -> Self {
        Self {
            title,
            data: ChartData::from_points([("Used", 0.0), ("Free", 100.0)]),
        }
    }

    /// Out-of-range input is forwarded as-is.
    pub fn set_percent(&mut self, used: f64) {
        self.data.replace([("Used", used), ("Free", 100.0 - used)]);
    }

    pub fn used(&self) -> f64 {
        self.data.values()[0]
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarChart {
    pub title: &'static str,
    /// Y axis caption
    pub unit: &'static str,
    data: ChartData,
}

impl BarChart {
    fn new(title: &'static str, unit: &'static str, data: ChartData) -> Self {
        Self { title, unit, data }
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }
}

/// Which chart surfaces exist in the layout.
///
/// A missing anchor leaves that chart unset and its updates become no-ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChartAnchors {
    pub cpu: bool,
    pub ram: bool,
    pub speed: bool,
    pub multi_ping: bool,
}

impl Default for ChartAnchors {
    fn default() -> Self {
        Self {
            cpu: true,
            ram: true,
            speed: true,
            multi_ping: true,
        }
    }
}

/// The four charts of the dashboard
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Charts {
    pub cpu: Option<GaugeChart>,
    pub ram: Option<GaugeChart>,
    pub speed: Option<BarChart>,
    pub multi_ping: Option<BarChart>,
}

impl Charts {
    pub fn setup(anchors: ChartAnchors) -> Self {
        Self {
            cpu: anchors.cpu.then(|| GaugeChart::new("CPU")),
            ram: anchors.ram.then(|| GaugeChart::new("RAM")),
            speed: anchors.speed.then(|| {
                BarChart::new(
                    "SPEED",
                    "Mbps",
                    ChartData::from_points([("Download", 0.0), ("Upload", 0.0)]),
                )
            }),
            multi_ping: anchors
                .multi_ping
                .then(|| BarChart::new("RESPONSE TIME", "ms", ChartData::default())),
        }
    }

    pub fn has_system_gauges(&self) -> bool {
        self.cpu.is_some() && self.ram.is_some()
    }

    pub fn update_system_charts(&mut self, cpu: f64, ram: f64) {
        if let Some(chart) = self.cpu.as_mut() {
            chart.set_percent(cpu);
        }
        if let Some(chart) = self.ram.as_mut() {
            chart.set_percent(ram);
        }
    }

    pub fn update_speed_chart(&mut self, download_mbps: f64, upload_mbps: f64) {
        if let Some(chart) = self.speed.as_mut() {
            chart
                .data
                .replace([("Download", download_mbps), ("Upload", upload_mbps)]);
        }
    }

    /// One bar per answering host, in milliseconds.
    ///
    /// Unreachable hosts and zero times are dropped; input order is kept.
    pub fn update_multi_ping_chart(&mut self, points: &[ChartPoint]) {
        let Some(chart) = self.multi_ping.as_mut() else {
            return;
        };
        chart.data.replace(
            points
                .iter()
                .filter(|p| p.status.is_reachable() && p.response_time_secs > 0.0)
                .map(|p| (p.ip.clone(), p.response_time_secs * 1000.0)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PingStatus;
    use pretty_assertions::assert_eq;

    fn point(ip: &str, status: PingStatus, secs: f64) -> ChartPoint {
        ChartPoint {
            ip: ip.into(),
            status,
            response_time_secs: secs,
        }
    }

    #[test]
    fn gauges_always_sum_to_one_hundred() {
        let mut charts = Charts::setup(ChartAnchors::default());
        for p in [0.0, 12.5, 50.0, 99.9, 100.0] {
            charts.update_system_charts(p, 100.0 - p);
            let cpu = charts.cpu.as_ref().unwrap().data().values().to_vec();
            let ram = charts.ram.as_ref().unwrap().data().values().to_vec();
            assert_eq!(cpu, vec![p, 100.0 - p]);
            assert!((cpu.iter().sum::<f64>() - 100.0).abs() < 1e-9);
            assert!((ram.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn out_of_range_gauge_values_are_forwarded() {
        let mut charts = Charts::setup(ChartAnchors::default());
        charts.update_system_charts(150.0, -10.0);
        assert_eq!(charts.cpu.as_ref().unwrap().data().values(), &[150.0, -50.0]);
        assert_eq!(charts.ram.as_ref().unwrap().data().values(), &[-10.0, 110.0]);
    }

    #[test]
    fn speed_chart_replaces_both_bars() {
        let mut charts = Charts::setup(ChartAnchors::default());
        charts.update_speed_chart(93.4, 11.2);
        let data = charts.speed.as_ref().unwrap().data();
        assert_eq!(data.labels(), &["Download".to_string(), "Upload".to_string()]);
        assert_eq!(data.values(), &[93.4, 11.2]);
    }

    #[test]
    fn multi_ping_chart_drops_unreachable_hosts() {
        let mut charts = Charts::setup(ChartAnchors::default());
        charts.update_multi_ping_chart(&[
            point("8.8.8.8", PingStatus::Reachable, 0.012),
            point("192.168.1.1", PingStatus::Unreachable, 0.0),
            point("10.0.0.1", PingStatus::Reachable, 0.0),
            point("1.1.1.1", PingStatus::Reachable, 0.5),
            point("10.0.0.2", PingStatus::Unreachable, 0.3),
        ]);

        let data = charts.multi_ping.as_ref().unwrap().data();
        assert_eq!(data.labels(), &["8.8.8.8".to_string(), "1.1.1.1".to_string()]);
        assert_eq!(data.len(), 2);
        assert!((data.values()[0] - 12.0).abs() < 1e-9);
        assert_eq!(data.values()[1], 500.0);
    }

    #[test]
    fn multi_ping_chart_replaces_previous_render() {
        let mut charts = Charts::setup(ChartAnchors::default());
        charts.update_multi_ping_chart(&[point("8.8.8.8", PingStatus::Reachable, 0.1)]);
        charts.update_multi_ping_chart(&[point("1.1.1.1", PingStatus::Unreachable, 0.0)]);
        assert!(charts.multi_ping.as_ref().unwrap().data().is_empty());
    }

    #[test]
    fn missing_anchors_skip_charts() {
        let mut charts = Charts::setup(ChartAnchors {
            cpu: true,
            ram: false,
            speed: false,
            multi_ping: false,
        });
        assert!(!charts.has_system_gauges());
        assert!(charts.speed.is_none());

        charts.update_speed_chart(1.0, 2.0);
        charts.update_multi_ping_chart(&[point("8.8.8.8", PingStatus::Reachable, 0.1)]);
        charts.update_system_charts(40.0, 60.0);
        assert_eq!(charts.cpu.as_ref().unwrap().used(), 40.0);
        assert!(charts.ram.is_none());
    }
}
