//! Batch notification orchestrator
//!
//! Drives one uploaded sheet end to end: learn guardian names, then per
//! record validate, normalize the contact number, classify the student's
//! first name, compose the message, and fire the two best-effort side
//! effects (audio synthesis, voice call). Failures of any single record are
//! isolated; the batch always runs to completion and returns a full report.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::classifier::{Method, NameClass, NameClassifier};
use crate::message;
use crate::models::{BatchReport, CallOutcome, DispatchStatus, StudentRecord};
use crate::phone;
use crate::services::{SpeechSynthesizer, VoiceGateway};

/// Minimum-interval gate in front of the telephony collaborator.
///
/// Replaces a fixed sleep between records: the first call goes out
/// immediately, every later call waits out the remainder of the interval.
struct CallThrottle {
    last_call: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl CallThrottle {
    fn new(min_interval: Duration) -> Self {
        Self { last_call: Mutex::new(None), min_interval }
    }

    async fn wait(&self) {
        let mut last = self.last_call.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("call throttle: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// One-batch orchestrator. Owns the classifier and the outcome sequence for
/// the lifetime of a single run; nothing survives across batches.
pub struct BatchProcessor {
    tts: Arc<dyn SpeechSynthesizer>,
    telephony: Arc<dyn VoiceGateway>,
    from_number: String,
    tts_locale: String,
    throttle: CallThrottle,
}

impl BatchProcessor {
    pub fn new(
        tts: Arc<dyn SpeechSynthesizer>,
        telephony: Arc<dyn VoiceGateway>,
        from_number: String,
        tts_locale: String,
        min_call_interval: Duration,
    ) -> Self {
        Self {
            tts,
            telephony,
            from_number,
            tts_locale,
            throttle: CallThrottle::new(min_call_interval),
        }
    }

    /// Run the full batch and return the aggregated report.
    ///
    /// Records are processed strictly in input order. Invalid records are
    /// skipped without an outcome; audio and call failures are captured in
    /// the record's outcome and never abort the batch.
    pub async fn run(&self, records: &[StudentRecord]) -> BatchReport {
        let mut classifier = NameClassifier::new();
        classifier.learn(records.iter().filter(|r| r.is_valid()));

        tracing::info!(
            father_names = classifier.masculine_count(),
            mother_names = classifier.feminine_count(),
            "guardian names learned from sheet"
        );

        let mut report = BatchReport {
            learned_father_names: classifier.masculine_count(),
            learned_mother_names: classifier.feminine_count(),
            ..Default::default()
        };

        for (index, record) in records.iter().enumerate() {
            if !record.is_valid() {
                tracing::warn!(row = index + 1, "skipping row: missing required data");
                report.skipped += 1;
                continue;
            }

            let outcome = self.process_record(record, &classifier, &mut report).await;
            report.processed += 1;
            report.outcomes.push(outcome);
        }

        tracing::info!(
            processed = report.processed,
            skipped = report.skipped,
            calls_initiated = report.calls_initiated,
            calls_failed = report.calls_failed,
            audio_generated = report.audio_generated,
            "batch complete"
        );

        report
    }

    async fn process_record(
        &self,
        record: &StudentRecord,
        classifier: &NameClassifier,
        report: &mut BatchReport,
    ) -> CallOutcome {
        let phone = phone::normalize(&record.father_contact);

        let classification = classifier.classify(record.first_name());
        if classification.method == Method::Default {
            report.default_classifications += 1;
        }
        let relation = match classification.class {
            NameClass::Masculine => "son",
            NameClass::Feminine => "daughter",
        };

        let msg = message::compose(record, relation);

        tracing::info!(
            student = %record.name,
            roll_no = %record.roll_no,
            relation,
            phone = %phone,
            "processing record"
        );

        // Audio and call are independent side effects: a synthesis failure
        // must not block the call.
        let audio_url = match self.tts.synthesize(&msg, &self.tts_locale).await {
            Ok(artifact) => {
                report.audio_generated += 1;
                Some(artifact.url)
            }
            Err(e) => {
                tracing::warn!(student = %record.name, error = %e, "audio synthesis failed");
                None
            }
        };

        self.throttle.wait().await;

        let (status, call_sid) = match self
            .telephony
            .place_call(&phone, &self.from_number, &msg)
            .await
        {
            Ok(handle) => {
                tracing::info!(student = %record.name, sid = %handle.sid, "call initiated");
                report.calls_initiated += 1;
                (DispatchStatus::Initiated, Some(handle.sid))
            }
            Err(e) => {
                tracing::warn!(student = %record.name, error = %e, "call failed");
                report.calls_failed += 1;
                (DispatchStatus::Failed(e.to_string()), None)
            }
        };

        CallOutcome {
            name: record.name.clone(),
            roll_no: record.roll_no.clone(),
            father_name: record.father_name.clone(),
            phone,
            relation: relation.to_string(),
            message: msg,
            result: record.result.clone(),
            spi: record.spi.clone(),
            status,
            call_sid,
            audio_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{AudioArtifact, CallError, CallHandle, CallStatusInfo, TtsError};
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    struct FakeTts {
        fail: bool,
        texts: StdMutex<Vec<String>>,
    }

    impl FakeTts {
        fn new(fail: bool) -> Self {
            Self { fail, texts: StdMutex::new(Vec::new()) }
        }

        fn invocations(&self) -> usize {
            self.texts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for FakeTts {
        async fn synthesize(&self, text: &str, _locale: &str) -> Result<AudioArtifact, TtsError> {
            self.texts.lock().unwrap().push(text.to_string());
            if self.fail {
                return Err(TtsError::Endpoint(503));
            }
            Ok(AudioArtifact {
                file_name: "out.mp3".into(),
                url: "/static/out.mp3".into(),
            })
        }
    }

    struct FakeGateway {
        fail: bool,
        calls: StdMutex<Vec<(String, String)>>,
    }

    impl FakeGateway {
        fn new(fail: bool) -> Self {
            Self { fail, calls: StdMutex::new(Vec::new()) }
        }

        fn invocations(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl VoiceGateway for FakeGateway {
        async fn place_call(
            &self,
            to: &str,
            _from: &str,
            spoken_text: &str,
        ) -> Result<CallHandle, CallError> {
            let count = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((to.to_string(), spoken_text.to_string()));
                calls.len()
            };
            if self.fail {
                return Err(CallError::Api(401, "authentication failed".into()));
            }
            Ok(CallHandle { sid: format!("CA{:03}", count), status: "queued".into() })
        }

        async fn call_status(&self, _sid: &str) -> Result<CallStatusInfo, CallError> {
            Ok(CallStatusInfo {
                status: "completed".into(),
                duration: Some("12".into()),
                start_time: None,
                end_time: None,
            })
        }
    }

    fn processor(tts: Arc<FakeTts>, gateway: Arc<FakeGateway>) -> BatchProcessor {
        BatchProcessor::new(
            tts,
            gateway,
            "+15550001111".into(),
            "en".into(),
            Duration::ZERO,
        )
    }

    fn record(
        name: &str,
        result: &str,
        father: &str,
        mother: &str,
        contact: &str,
    ) -> StudentRecord {
        StudentRecord {
            name: name.into(),
            roll_no: "CE042".into(),
            semester: "4".into(),
            spi: "8.2".into(),
            result: result.into(),
            father_name: father.into(),
            mother_name: mother.into(),
            father_contact: contact.into(),
        }
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_report() {
        let tts = Arc::new(FakeTts::new(false));
        let gateway = Arc::new(FakeGateway::new(false));
        let report = processor(tts.clone(), gateway.clone()).run(&[]).await;

        assert!(report.outcomes.is_empty());
        assert_eq!(report.processed, 0);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.calls_initiated, 0);
        assert_eq!(report.learned_father_names, 0);
        assert_eq!(tts.invocations(), 0);
        assert_eq!(gateway.invocations(), 0);
    }

    #[tokio::test]
    async fn record_missing_contact_is_skipped_without_side_effects() {
        let tts = Arc::new(FakeTts::new(false));
        let gateway = Arc::new(FakeGateway::new(false));
        let records = vec![record("Amit Patel", "Pass", "Rajesh Patel", "Sunita Patel", "")];

        let report = processor(tts.clone(), gateway.clone()).run(&records).await;

        assert!(report.outcomes.is_empty());
        assert_eq!(report.processed, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(tts.invocations(), 0);
        assert_eq!(gateway.invocations(), 0);
    }

    #[tokio::test]
    async fn audio_failure_does_not_block_the_call() {
        let tts = Arc::new(FakeTts::new(true));
        let gateway = Arc::new(FakeGateway::new(false));
        let records = vec![
            record("Amit Patel", "Pass", "Rajesh Patel", "Sunita Patel", "9876543210"),
            record("Priya Shah", "Fail", "Mahesh Shah", "Kiran Shah", "9876501234"),
        ];

        let report = processor(tts, gateway.clone()).run(&records).await;

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.audio_generated, 0);
        assert_eq!(report.calls_initiated, 2);
        assert_eq!(gateway.invocations(), 2);
        for outcome in &report.outcomes {
            assert!(outcome.audio_url.is_none());
            assert!(outcome.status.is_initiated());
            assert!(outcome.call_sid.is_some());
        }
    }

    #[tokio::test]
    async fn call_failure_is_recorded_per_record() {
        let tts = Arc::new(FakeTts::new(false));
        let gateway = Arc::new(FakeGateway::new(true));
        let records =
            vec![record("Amit Patel", "Pass", "Rajesh Patel", "Sunita Patel", "9876543210")];

        let report = processor(tts, gateway).run(&records).await;

        assert_eq!(report.calls_failed, 1);
        assert_eq!(report.calls_initiated, 0);
        let outcome = &report.outcomes[0];
        assert!(outcome.call_sid.is_none());
        match &outcome.status {
            DispatchStatus::Failed(reason) => assert!(reason.contains("authentication failed")),
            other => panic!("expected failed status, got {:?}", other),
        }
        // Audio succeeded independently of the call failure.
        assert_eq!(report.audio_generated, 1);
    }

    #[tokio::test]
    async fn relation_and_message_follow_learned_guardian_names() {
        let tts = Arc::new(FakeTts::new(false));
        let gateway = Arc::new(FakeGateway::new(false));
        let records = vec![
            // Student first token "raj" appears in the father-name set.
            record("Raj Verma", "Pass", "Raj Kumar Verma", "Anita Verma", "+91-9876543210"),
            // Student first token "sunita" appears in the mother-name set.
            record("Sunita Sharma", "Fail", "Dinesh Sharma", "Sunita Devi", "9876501234"),
        ];

        let report = processor(tts, gateway.clone()).run(&records).await;

        assert_eq!(report.outcomes.len(), 2);
        let pass = &report.outcomes[0];
        let fail = &report.outcomes[1];

        assert_eq!(pass.relation, "son");
        assert!(pass.message.contains("has passed semester 4 with SPI 8.2"));
        assert_eq!(pass.phone, "+919876543210");

        assert_eq!(fail.relation, "daughter");
        assert!(fail.message.contains("has failed semester 4"));
        assert!(!fail.message.contains("SPI"));

        // Outcomes preserve input order and the gateway saw normalized numbers.
        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls[0].0, "+919876543210");
        assert_eq!(calls[1].0, "+919876501234");
    }

    #[tokio::test]
    async fn unknown_name_with_shared_prefix_classifies_by_similarity() {
        let tts = Arc::new(FakeTts::new(false));
        let gateway = Arc::new(FakeGateway::new(false));
        let records = vec![
            record("Ravi Desai", "Pass", "Ravindra Desai", "Meena Desai", "9876543210"),
        ];

        let report = processor(tts, gateway).run(&records).await;

        // "ravi" is not a learned name but shares the "rav" prefix with the
        // father set, so no default classification is counted.
        assert_eq!(report.outcomes[0].relation, "son");
        assert_eq!(report.default_classifications, 0);
    }

    #[tokio::test]
    async fn default_classification_is_counted() {
        let tts = Arc::new(FakeTts::new(false));
        let gateway = Arc::new(FakeGateway::new(false));
        let records =
            vec![record("Zubin Mehta", "Pass", "Firoz Mehta", "Daisy Mehta", "9876543210")];

        let report = processor(tts, gateway).run(&records).await;

        assert_eq!(report.outcomes[0].relation, "son");
        assert_eq!(report.default_classifications, 1);
    }

    #[tokio::test]
    async fn throttle_lets_first_call_through_immediately() {
        let throttle = CallThrottle::new(Duration::from_secs(60));
        let start = Instant::now();
        throttle.wait().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn throttle_spaces_out_consecutive_calls() {
        let throttle = CallThrottle::new(Duration::from_secs(2));
        throttle.wait().await;

        let start = Instant::now();
        throttle.wait().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
