#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tikpost::{
    Config, Credentials, FilePart, HttpBackend, HttpRequest, PlatformClient, RawResponse, Sleeper,
    Transport, TransportFailure,
};

pub const BASE_URL: &str = "https://open.test/v2";

type Scripted = std::result::Result<RawResponse, TransportFailure>;

/// Call observed by the scripted backend, in order
#[derive(Debug, Clone)]
pub enum Call {
    Send(HttpRequest),
    Upload { url: String, part: FilePart },
}

/// Backend answering from a script; an exhausted script behaves like a
/// dropped connection.
#[derive(Default)]
pub struct ScriptedBackend {
    sends: Mutex<VecDeque<Scripted>>,
    uploads: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(ScriptedBackend::default())
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.sends
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::new(status, body.as_bytes().to_vec())));
        self
    }

    pub fn fail(&self, failure: TransportFailure) -> &Self {
        self.sends.lock().unwrap().push_back(Err(failure));
        self
    }

    pub fn upload_responds(&self, status: u16, body: &str) -> &Self {
        self.uploads
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::new(status, body.as_bytes().to_vec())));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send(request) => Some(request),
                Call::Upload { .. } => None,
            })
            .collect()
    }
}

fn offline() -> TransportFailure {
    TransportFailure::Network("connection refused".into())
}

impl HttpBackend for ScriptedBackend {
    fn send(&self, request: &HttpRequest) -> Scripted {
        self.calls.lock().unwrap().push(Call::Send(request.clone()));
        self.sends.lock().unwrap().pop_front().unwrap_or_else(|| Err(offline()))
    }

    fn upload(&self, url: &str, part: FilePart) -> Scripted {
        self.calls.lock().unwrap().push(Call::Upload {
            url: url.to_string(),
            part,
        });
        self.uploads.lock().unwrap().pop_front().unwrap_or_else(|| Err(offline()))
    }
}

/// Sleeper that records waits instead of blocking
#[derive(Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingSleeper::default())
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

pub fn transport_with(
    config: Config,
    backend: &Arc<ScriptedBackend>,
    sleeper: &Arc<RecordingSleeper>,
) -> Transport {
    Transport::new(config, Credentials::new("test-key", "test-secret"), backend.clone())
        .with_sleeper(sleeper.clone())
}

pub fn transport(backend: &Arc<ScriptedBackend>, sleeper: &Arc<RecordingSleeper>) -> Transport {
    transport_with(Config::new(BASE_URL), backend, sleeper)
}

pub fn platform(backend: &Arc<ScriptedBackend>) -> PlatformClient {
    PlatformClient::new(transport(backend, &RecordingSleeper::new()))
}
