//! In-memory controller for adapter tests.

use async_trait::async_trait;
use genwatch_adapter_http::{EndpointResponse, Transport, TransportError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub struct FakeDevice {
    pages: Mutex<HashMap<String, (u16, String)>>,
    requests: Mutex<Vec<String>>,
    offline: AtomicBool,
}

impl FakeDevice {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn serve(&self, path: &str, status: u16, body: &str) {
        self.pages
            .lock()
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Requests so far as `path` or `path?query`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }
}

#[async_trait]
impl Transport for FakeDevice {
    async fn fetch(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<EndpointResponse, TransportError> {
        let request = match query {
            Some(query) => format!("{path}?{query}"),
            None => path.to_string(),
        };
        self.requests.lock().push(request);

        if self.offline.load(Ordering::SeqCst) {
            return Err(TransportError::Request("host unreachable".to_string()));
        }

        let (status_code, body) = self
            .pages
            .lock()
            .get(path)
            .cloned()
            .unwrap_or((404, String::new()));
        Ok(EndpointResponse { status_code, body })
    }

    fn host(&self) -> &str {
        "192.168.1.50"
    }
}

/// An 18-line status feed with the given state code and `lcd_status`.
pub fn status_feed(state: &str, lcd_status: &str) -> String {
    let mut lines = vec!["0"; 18];
    lines[3] = "125";
    lines[4] = state;
    lines[5] = "40";
    lines[6] = "35";
    lines[7] = "240";
    lines[8] = "60";
    lines[9] = "600";
    lines[13] = lcd_status;
    lines.join("\n")
}

/// A device serving a running genset and a full set of settings pages.
pub fn running_device() -> Arc<FakeDevice> {
    let device = FakeDevice::new();
    device.serve("/index_data.html", 200, &status_feed("4", "12"));
    device.serve("/wr_logical.cgi", 200, "");
    device.serve(
        "/loads.html",
        200,
        r#"writeSingleOption( 1, !(0 & 0x01), "Manual" );"#,
    );
    device.serve("/loads_data.html", 200, "0\n0\n1\n");
    device.serve(
        "/exercise.html",
        200,
        r#"var match = 1;
writeSingleOption(0,match == 0, "Never");
writeDays(3);
hrs24ToHrs12(14);
var match = 2;"#,
    );
    device
}
