//! Test data builders for creating test objects

use sensor_replay::types::Record;

/// Builder for sensor CSV text in the layout the board logs
pub struct SensorCsvBuilder {
    start: chrono::NaiveDateTime,
    step_secs: i64,
    rows: Vec<(f64, i64, i64, f64)>,
}

impl SensorCsvBuilder {
    pub fn new() -> Self {
        Self {
            start: chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
                .and_then(|d| d.and_hms_opt(10, 0, 0))
                .expect("valid start time"),
            step_secs: 1,
            rows: Vec::new(),
        }
    }

    pub fn step_secs(mut self, step_secs: i64) -> Self {
        self.step_secs = step_secs;
        self
    }

    /// Add a row of `dht_temp, dht_hum, soil, ds18_1`
    pub fn row(mut self, dht_temp: f64, dht_hum: i64, soil: i64, ds18_1: f64) -> Self {
        self.rows.push((dht_temp, dht_hum, soil, ds18_1));
        self
    }

    /// Add `n` rows with slowly changing readings
    pub fn rows(mut self, n: usize) -> Self {
        for i in 0..n {
            let i_f = i as f64;
            self.rows.push((
                20.5 + i_f * 0.25,
                55 + (i as i64 % 10),
                300 + i as i64,
                18.75 + i_f * 0.5,
            ));
        }
        self
    }

    pub fn build(self) -> String {
        let mut out = String::from("timestamp,dht_temp,dht_hum,soil,ds18_1\n");
        for (i, (temp, hum, soil, ds18)) in self.rows.iter().enumerate() {
            let ts = self.start + chrono::Duration::seconds(self.step_secs * i as i64);
            out.push_str(&format!(
                "{},{:?},{},{},{:?}\n",
                ts.format("%Y-%m-%d %H:%M:%S"),
                temp,
                hum,
                soil,
                ds18
            ));
        }
        out
    }
}

impl Default for SensorCsvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for in-memory records
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self {
            record: Record::default(),
        }
    }

    pub fn int(mut self, name: &str, value: i64) -> Self {
        self.record = self.record.with(name, value);
        self
    }

    pub fn float(mut self, name: &str, value: f64) -> Self {
        self.record = self.record.with(name, value);
        self
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.record = self.record.with(name, value);
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_csv_builder() {
        let csv = SensorCsvBuilder::new().row(21.5, 60, 300, 19.0).build();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("timestamp,dht_temp,dht_hum,soil,ds18_1"));
        assert_eq!(lines.next(), Some("2024-05-01 10:00:00,21.5,60,300,19.0"));
    }
}
