//! 合成流程整合測試
//!
//! 以假的媒體工具取代 ffprobe / ffmpeg，驗證流程、錯誤與暫存檔清理

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use auto_short_video::component::video_composer::{
    BatchStatus, CaptionStyle, Composer, CompositionRequest, EncodeJob, ExplicitCue,
    MediaToolkit, parse_srt_time, run_batch,
};
use auto_short_video::config::ComposerSettings;
use auto_short_video::error::{AssetKind, ComposeError, ValidationError};
use tempfile::TempDir;

/// 編碼時記錄字幕內容並寫出假的輸出檔
#[derive(Default)]
struct FakeToolkit {
    duration: Option<f64>,
    fail_encode: bool,
    jobs: Mutex<Vec<(EncodeJob, String)>>,
}

impl FakeToolkit {
    fn with_duration(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            ..Self::default()
        }
    }

    fn jobs(&self) -> Vec<(EncodeJob, String)> {
        self.jobs.lock().unwrap().clone()
    }
}

impl MediaToolkit for FakeToolkit {
    fn probe_duration(&self, audio_path: &Path) -> Result<f64, ComposeError> {
        self.duration.ok_or_else(|| ComposeError::Probe {
            path: audio_path.to_path_buf(),
            message: "Invalid data found when processing input".to_string(),
        })
    }

    fn encode(&self, job: &EncodeJob) -> Result<(), ComposeError> {
        let srt = fs::read_to_string(&job.caption_path).expect("字幕暫存檔應該存在");
        self.jobs.lock().unwrap().push((job.clone(), srt));

        if self.fail_encode {
            return Err(ComposeError::Encoding {
                message: "Error opening output file".to_string(),
            });
        }
        fs::write(&job.output_path, b"fake mp4").unwrap();
        Ok(())
    }
}

struct Workspace {
    dir: TempDir,
    settings: ComposerSettings,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("videos")).unwrap();
        fs::write(root.join("videos").join("forest.mp4"), b"").unwrap();
        fs::write(root.join("videos").join("city.MOV"), b"").unwrap();
        fs::write(root.join("final.wav"), b"RIFF").unwrap();

        let settings = ComposerSettings {
            background_dir: root.join("videos"),
            output_dir: root.join("outputs"),
            temp_dir: root.join("tmp"),
            ..ComposerSettings::default()
        };
        Self { dir, settings }
    }

    fn audio(&self) -> PathBuf {
        self.dir.path().join("final.wav")
    }

    fn add_audio(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, b"RIFF").unwrap();
        path
    }

    fn leftover_captions(&self) -> Vec<PathBuf> {
        match fs::read_dir(&self.settings.temp_dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "srt"))
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

fn srt_cues(srt: &str) -> Vec<(f64, f64, String)> {
    srt.split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .map(|block| {
            let lines: Vec<&str> = block.lines().collect();
            let (start, end) = lines[1].split_once(" --> ").unwrap();
            (
                parse_srt_time(start).unwrap(),
                parse_srt_time(end).unwrap(),
                lines.get(2).copied().unwrap_or("").to_string(),
            )
        })
        .collect()
}

#[test]
fn test_hello_world_end_to_end() {
    let ws = Workspace::new();
    let composer = Composer::with_toolkit(ws.settings.clone(), FakeToolkit::with_duration(2.0));

    let request = CompositionRequest::from_text("hello world", ws.audio());
    let output = composer.create_video(&request).unwrap();

    assert!(output.exists());
    assert!(output.starts_with(&ws.settings.output_dir));
    assert!(output.file_name().unwrap().to_string_lossy().starts_with("final_"));

    let jobs = composer.toolkit().jobs();
    assert_eq!(jobs.len(), 1);
    let (job, srt) = &jobs[0];
    assert_eq!(
        srt_cues(srt),
        vec![
            (0.0, 1.0, "hello".to_string()),
            (1.0, 2.0, "world".to_string())
        ]
    );
    assert_eq!(job.audio_path, ws.audio());
    assert!(job.background_path.starts_with(&ws.settings.background_dir));
    assert_eq!(job.video_label, "vout");
    assert!(job.filter_graph.ends_with("[vout]"));
    assert!(job.filter_graph.contains("subtitles="));
    assert!(job.filter_graph.contains("FontName=Arial"));

    assert!(!job.caption_path.exists(), "字幕暫存檔應該已刪除");
    assert!(ws.leftover_captions().is_empty());
}

#[test]
fn test_explicit_output_path_and_style() {
    let ws = Workspace::new();
    let composer = Composer::with_toolkit(ws.settings.clone(), FakeToolkit::with_duration(3.0));

    let output_path = ws.dir.path().join("custom").join("story.mp4");
    let mut request = CompositionRequest::from_text("a b c", ws.audio());
    request.output_path = Some(output_path.clone());
    request.style = CaptionStyle::Gaming;
    request.zoom_enabled = true;
    request.background_dim_factor = 1.0;

    assert_eq!(composer.create_video(&request).unwrap(), output_path);

    let (job, _) = &composer.toolkit().jobs()[0];
    assert!(job.filter_graph.contains("FontName=Arial Black"));
    assert!(job.filter_graph.contains("zoompan="));
    assert!(job.filter_graph.contains("on/90,"));
    assert!(job.filter_graph.contains("eq=brightness=0.000:contrast=1.000"));
}

#[test]
fn test_missing_audio() {
    let ws = Workspace::new();
    let composer = Composer::with_toolkit(ws.settings.clone(), FakeToolkit::with_duration(2.0));

    let request = CompositionRequest::from_text("hello", ws.dir.path().join("missing.wav"));
    let err = composer.create_video(&request).unwrap_err();
    assert!(matches!(
        err,
        ComposeError::MissingAsset {
            kind: AssetKind::NarrationAudio,
            ..
        }
    ));
}

#[test]
fn test_missing_background_directory() {
    let ws = Workspace::new();
    let mut settings = ws.settings.clone();
    settings.background_dir = ws.dir.path().join("no_such_dir");
    let composer = Composer::with_toolkit(settings, FakeToolkit::with_duration(2.0));

    let err = composer
        .create_video(&CompositionRequest::from_text("hello", ws.audio()))
        .unwrap_err();
    assert!(matches!(
        err,
        ComposeError::MissingAsset {
            kind: AssetKind::BackgroundLibrary,
            ..
        }
    ));
}

#[test]
fn test_background_directory_with_only_text_file() {
    let ws = Workspace::new();
    let only_text = ws.dir.path().join("text_only");
    fs::create_dir(&only_text).unwrap();
    fs::write(only_text.join("notes.txt"), "hello").unwrap();

    let mut settings = ws.settings.clone();
    settings.background_dir = only_text;
    let composer = Composer::with_toolkit(settings, FakeToolkit::with_duration(2.0));

    let err = composer
        .create_video(&CompositionRequest::from_text("hello", ws.audio()))
        .unwrap_err();
    assert!(matches!(err, ComposeError::EmptyLibrary { .. }));
}

#[test]
fn test_duration_lookup_failure_propagates_without_caption_file() {
    let ws = Workspace::new();
    let composer = Composer::with_toolkit(ws.settings.clone(), FakeToolkit::default());

    let err = composer
        .create_video(&CompositionRequest::from_text("hello", ws.audio()))
        .unwrap_err();
    match err {
        ComposeError::Probe { message, .. } => {
            assert_eq!(message, "Invalid data found when processing input");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(composer.toolkit().jobs().is_empty());
    assert!(ws.leftover_captions().is_empty());
}

#[test]
fn test_explicit_cue_error_names_index_two() {
    let ws = Workspace::new();
    let composer = Composer::with_toolkit(ws.settings.clone(), FakeToolkit::with_duration(5.0));

    let request = CompositionRequest::from_cues(
        vec![
            ExplicitCue::new("first", 0.0, 1.0),
            ExplicitCue::new("second", 2.5, 2.0),
        ],
        ws.audio(),
    );
    let err = composer.create_video(&request).unwrap_err();
    assert_eq!(err.cue_index(), Some(2));
    assert!(matches!(
        err,
        ComposeError::Validation(ValidationError::InvalidCue { index: 2, .. })
    ));
    assert!(ws.leftover_captions().is_empty());
}

#[test]
fn test_request_without_caption_source() {
    let ws = Workspace::new();
    let composer = Composer::with_toolkit(ws.settings.clone(), FakeToolkit::with_duration(5.0));

    let mut request = CompositionRequest::from_text("unused", ws.audio());
    request.narration_text = None;
    assert!(matches!(
        composer.create_video(&request),
        Err(ComposeError::Validation(
            ValidationError::MissingCaptionSource
        ))
    ));
}

#[test]
fn test_empty_cue_list_rejected_before_encoding() {
    let ws = Workspace::new();
    let composer = Composer::with_toolkit(ws.settings.clone(), FakeToolkit::with_duration(5.0));

    let request = CompositionRequest::from_cues(Vec::new(), ws.audio());
    assert!(matches!(
        composer.create_video(&request),
        Err(ComposeError::Validation(ValidationError::EmptyCueList))
    ));
    assert!(composer.toolkit().jobs().is_empty());
    assert!(ws.leftover_captions().is_empty());
}

#[test]
fn test_explicit_cues_written_verbatim() {
    let ws = Workspace::new();
    let composer = Composer::with_toolkit(ws.settings.clone(), FakeToolkit::with_duration(10.0));

    let request = CompositionRequest::from_cues(
        vec![
            ExplicitCue::new("In the dark hallway,", 0.0, 1.75),
            ExplicitCue::new("something was breathing", 1.75, 3.5),
        ],
        ws.audio(),
    );
    composer.create_video(&request).unwrap();

    let (_, srt) = &composer.toolkit().jobs()[0];
    assert_eq!(
        srt_cues(srt),
        vec![
            (0.0, 1.75, "In the dark hallway,".to_string()),
            (1.75, 3.5, "something was breathing".to_string()),
        ]
    );
}

#[test]
fn test_caption_removed_after_encoder_failure() {
    let ws = Workspace::new();
    let toolkit = FakeToolkit {
        duration: Some(2.0),
        fail_encode: true,
        ..FakeToolkit::default()
    };
    let composer = Composer::with_toolkit(ws.settings.clone(), toolkit);

    let err = composer
        .create_video(&CompositionRequest::from_text("hello world", ws.audio()))
        .unwrap_err();
    match err {
        ComposeError::Encoding { message } => assert_eq!(message, "Error opening output file"),
        other => panic!("unexpected error: {other}"),
    }

    let jobs = composer.toolkit().jobs();
    assert_eq!(jobs.len(), 1, "編碼器應該被呼叫一次");
    assert!(!jobs[0].0.caption_path.exists());
    assert!(ws.leftover_captions().is_empty());
}

#[test]
fn test_concurrent_requests_use_distinct_caption_files() {
    let ws = Workspace::new();
    let composer = Composer::with_toolkit(ws.settings.clone(), FakeToolkit::with_duration(4.0));

    let requests: Vec<CompositionRequest> = (0..12)
        .map(|i| {
            let mut request = CompositionRequest::from_text(
                format!("story marker{i}x"),
                ws.add_audio(&format!("voice_{i}.wav")),
            );
            request.output_path = Some(ws.settings.output_dir.join(format!("story_{i}.mp4")));
            request
        })
        .collect();

    let shutdown = Arc::new(AtomicBool::new(false));
    let outcomes = run_batch(&composer, requests, &shutdown, None);

    assert_eq!(outcomes.len(), 12);
    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.index, i);
        assert_eq!(
            outcome.status,
            BatchStatus::Completed(ws.settings.output_dir.join(format!("story_{i}.mp4")))
        );
    }

    let jobs = composer.toolkit().jobs();
    let captions: HashSet<PathBuf> = jobs.iter().map(|(job, _)| job.caption_path.clone()).collect();
    assert_eq!(captions.len(), 12, "每個請求的字幕暫存檔都不同");

    for (job, srt) in &jobs {
        let story = job
            .output_path
            .file_stem()
            .unwrap()
            .to_string_lossy()
            .trim_start_matches("story_")
            .to_string();
        assert!(srt.contains(&format!("marker{story}x")), "字幕內容應屬於自己的請求");
    }
    assert!(ws.leftover_captions().is_empty());
}

#[test]
fn test_batch_cancelled_after_shutdown() {
    let ws = Workspace::new();
    let composer = Composer::with_toolkit(ws.settings.clone(), FakeToolkit::with_duration(1.0));

    let requests = vec![
        CompositionRequest::from_text("one", ws.audio()),
        CompositionRequest::from_text("two", ws.audio()),
    ];
    let shutdown = Arc::new(AtomicBool::new(true));
    let outcomes = run_batch(&composer, requests, &shutdown, None);

    assert!(outcomes.iter().all(|o| o.status == BatchStatus::Cancelled));
    assert!(composer.toolkit().jobs().is_empty());
}

#[test]
fn test_batch_reports_failures_in_order() {
    let ws = Workspace::new();
    let composer = Composer::with_toolkit(ws.settings.clone(), FakeToolkit::with_duration(1.0));

    let shared = ws.settings.output_dir.join("same.mp4");
    let mut first = CompositionRequest::from_text("one", ws.audio());
    first.output_path = Some(shared.clone());
    let mut duplicate = CompositionRequest::from_text("two", ws.audio());
    duplicate.output_path = Some(shared.clone());
    let missing = CompositionRequest::from_text("three", ws.dir.path().join("nope.wav"));

    let shutdown = Arc::new(AtomicBool::new(false));
    let outcomes = run_batch(&composer, vec![first, duplicate, missing], &shutdown, None);

    assert_eq!(outcomes[0].status, BatchStatus::Completed(shared));
    assert!(matches!(&outcomes[1].status, BatchStatus::Failed(msg) if msg.contains("第 1 個請求")));
    assert!(matches!(&outcomes[2].status, BatchStatus::Failed(msg) if msg.contains("找不到旁白音訊")));
}

/// 需要系統上有 ffmpeg，否則略過
#[test]
fn test_real_ffmpeg_composition() {
    let has_ffmpeg = std::process::Command::new("ffmpeg")
        .arg("-version")
        .output()
        .is_ok_and(|o| o.status.success());
    if !has_ffmpeg {
        println!("跳過測試：找不到 ffmpeg");
        return;
    }

    let ws = Workspace::new();
    let background = ws.settings.background_dir.join("forest.mp4");
    fs::remove_file(ws.settings.background_dir.join("city.MOV")).unwrap();
    let audio = ws.dir.path().join("tone.wav");

    let generated = std::process::Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y"])
        .args(["-f", "lavfi", "-i", "testsrc=size=640x360:rate=30:duration=4"])
        .arg(&background)
        .status()
        .is_ok_and(|s| s.success())
        && std::process::Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error", "-y"])
            .args(["-f", "lavfi", "-i", "sine=frequency=440:duration=2"])
            .arg(&audio)
            .status()
            .is_ok_and(|s| s.success());
    if !generated {
        println!("跳過測試：無法產生測試素材");
        return;
    }

    let composer = Composer::new(ws.settings.clone());
    let mut request = CompositionRequest::from_text("hello world", &audio);
    request.zoom_enabled = true;

    match composer.create_video(&request) {
        Ok(output) => {
            assert!(output.exists());
            assert!(ws.leftover_captions().is_empty());
        }
        // 部分 ffmpeg 建置沒有 libass 或 libx264
        Err(ComposeError::Encoding { message }) => {
            println!("跳過測試：ffmpeg 缺少必要元件: {message}");
            assert!(ws.leftover_captions().is_empty());
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
}
