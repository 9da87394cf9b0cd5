//! Orchestrator tests: the retention guarantee, the aggregate risk rule,
//! and authorization short-circuiting, all driven through injected fakes
//! with call-count assertions.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use daybreak_checkin::error::CheckinError;
use daybreak_checkin::store::{DailyLogStore, InMemoryLogStore, StoreError};
use daybreak_checkin::{CheckinService, VideoUpload};
use daybreak_core::models::caller::{Caller, Role};
use daybreak_core::models::daily_log::DailyLog;
use daybreak_gemini::analyze::PollConfig;
use daybreak_gemini::error::GeminiError;
use daybreak_gemini::files::{RemoteFile, RemoteFileState};
use daybreak_gemini::AnalysisProvider;
use daybreak_staging::{StagingArea, UploadLimits};

/// Provider fake: one poll to ACTIVE, then a canned generation result.
struct FakeProvider {
    output: Result<String, String>,
    fail_processing: bool,
    uploads: AtomicUsize,
}

impl FakeProvider {
    fn returning(output: &str) -> Self {
        Self {
            output: Ok(output.to_string()),
            fail_processing: false,
            uploads: AtomicUsize::new(0),
        }
    }

    fn failing_processing() -> Self {
        Self {
            output: Err("unused".to_string()),
            fail_processing: true,
            uploads: AtomicUsize::new(0),
        }
    }

    fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisProvider for FakeProvider {
    async fn upload_file(&self, _path: &Path, mime_type: &str) -> Result<RemoteFile, GeminiError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(RemoteFile {
            name: "files/fake".to_string(),
            uri: "https://provider.test/files/fake".to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    async fn file_state(&self, _name: &str) -> Result<RemoteFileState, GeminiError> {
        if self.fail_processing {
            Ok(RemoteFileState::Failed)
        } else {
            Ok(RemoteFileState::Active)
        }
    }

    async fn generate_assessment(&self, _file: &RemoteFile) -> Result<String, GeminiError> {
        self.output.clone().map_err(GeminiError::Api)
    }

    async fn delete_file(&self, _name: &str) -> Result<(), GeminiError> {
        Ok(())
    }
}

/// Store fake that counts inserts on top of the in-memory store.
struct CountingStore {
    inner: InMemoryLogStore,
    inserts: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: InMemoryLogStore::new(),
            inserts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DailyLogStore for CountingStore {
    async fn create(
        &self,
        user_id: Uuid,
        mood_score: u8,
        risk_flag: bool,
        analysis: serde_json::Value,
    ) -> Result<DailyLog, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.create(user_id, mood_score, risk_flag, analysis).await
    }
}

fn assessment_json(mood_score: u8) -> String {
    serde_json::json!({
        "mood_score": mood_score,
        "suicidal_ideation": false,
        "self_harm_indicators": false,
        "severe_distress": false,
        "speech_latency": "normal",
        "affect": "congruent",
        "eye_contact": "steady",
        "clinical_summary": "Calm presentation, speech within normal limits."
    })
    .to_string()
}

fn service(
    dir: &tempfile::TempDir,
    provider: Arc<FakeProvider>,
    store: Arc<CountingStore>,
) -> CheckinService {
    let staging = StagingArea::new(dir.path(), UploadLimits::default());
    let poll = PollConfig {
        interval: Duration::from_millis(1),
        ..PollConfig::default()
    };
    CheckinService::new(provider, store, staging, poll)
}

fn patient() -> Caller {
    Caller::new(Uuid::new_v4(), Role::Patient)
}

fn upload() -> VideoUpload {
    VideoUpload {
        bytes: vec![0u8; 2 * 1024 * 1024],
        content_type: "video/mp4".to_string(),
    }
}

fn staged_files(dir: &tempfile::TempDir) -> usize {
    std::fs::read_dir(dir.path()).map(|d| d.count()).unwrap_or(0)
}

#[tokio::test]
async fn successful_checkin_persists_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(FakeProvider::returning(&assessment_json(6)));
    let store = Arc::new(CountingStore::new());
    let svc = service(&dir, provider.clone(), store.clone());
    let caller = patient();

    let log = svc.submit(&caller, upload()).await.expect("check-in should succeed");

    assert_eq!(log.mood_score, 6);
    assert!(!log.risk_flag);
    assert_eq!(log.user_id, caller.user_id);
    assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
    assert_eq!(staged_files(&dir), 0, "no staged file may survive the request");

    let persisted = store.inner.logs().await;
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].analysis["mood_score"], 6);
}

#[tokio::test]
async fn low_mood_raises_risk_flag_without_boolean_indicators() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(FakeProvider::returning(&assessment_json(2)));
    let store = Arc::new(CountingStore::new());
    let svc = service(&dir, provider, store.clone());

    let log = svc.submit(&patient(), upload()).await.unwrap();

    assert_eq!(log.mood_score, 2);
    assert!(log.risk_flag, "mood 2 must raise the aggregate risk flag");
}

#[tokio::test]
async fn mood_three_does_not_raise_risk_flag() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(FakeProvider::returning(&assessment_json(3)));
    let store = Arc::new(CountingStore::new());
    let svc = service(&dir, provider, store.clone());

    let log = svc.submit(&patient(), upload()).await.unwrap();

    assert!(!log.risk_flag, "mood 3 with no indicators is below the risk threshold");
}

#[tokio::test]
async fn provider_failure_persists_nothing_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(FakeProvider::failing_processing());
    let store = Arc::new(CountingStore::new());
    let svc = service(&dir, provider, store.clone());

    let err = svc.submit(&patient(), upload()).await.expect_err("FAILED state should abort");

    assert!(matches!(err, CheckinError::Analysis(_)), "got: {err}");
    assert!(err.to_string().starts_with("Analysis failed:"));
    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    assert_eq!(staged_files(&dir), 0, "staging must be cleaned up on failure");
}

#[tokio::test]
async fn malformed_model_output_is_rejected_without_persistence() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(FakeProvider::returning("{\"mood_score\": 14}"));
    let store = Arc::new(CountingStore::new());
    let svc = service(&dir, provider, store.clone());

    let err = svc.submit(&patient(), upload()).await.expect_err("bad schema should abort");

    assert!(matches!(err, CheckinError::InvalidAssessment(_)));
    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    assert_eq!(staged_files(&dir), 0);
}

#[tokio::test]
async fn non_patient_is_rejected_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(FakeProvider::returning(&assessment_json(6)));
    let store = Arc::new(CountingStore::new());
    let svc = service(&dir, provider.clone(), store.clone());
    let doctor = Caller::new(Uuid::new_v4(), Role::Doctor);

    let err = svc.submit(&doctor, upload()).await.expect_err("doctors cannot submit check-ins");

    assert!(matches!(err, CheckinError::Forbidden));
    assert_eq!(provider.upload_count(), 0, "no provider call may happen");
    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    assert_eq!(staged_files(&dir), 0, "no staging may happen");
}

#[tokio::test]
async fn wrong_content_type_is_rejected_before_upload() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(FakeProvider::returning(&assessment_json(6)));
    let store = Arc::new(CountingStore::new());
    let svc = service(&dir, provider.clone(), store.clone());

    let bad = VideoUpload {
        bytes: vec![0u8; 16],
        content_type: "audio/mpeg".to_string(),
    };
    let err = svc.submit(&patient(), bad).await.expect_err("audio/mpeg should be rejected");

    assert!(matches!(err, CheckinError::InvalidUpload(_)));
    assert_eq!(provider.upload_count(), 0);
    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
}
