//! End-to-end behavior of the three-strategy load chain, driven through a
//! recording linker so no real shared objects are needed.

use std::cell::RefCell;
use std::error::Error;
use std::path::{Path, PathBuf};

use trident_core::errors::{BoxError, LoadErrorKind};
use trident_core::platform::Platform;
use trident_loader::{LoadOrigin, Linker, NativeLoader, StaticBundle};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Accept {
    Nothing,
    SystemSearch,
    ProgramDir,
    Extracted,
}

/// Accepts exactly one strategy and records every attempt. For extracted
/// copies it captures the file contents seen at load time.
struct RecordingLinker {
    accept: Accept,
    program_dir: PathBuf,
    attempts: RefCell<Vec<&'static str>>,
}

impl RecordingLinker {
    fn new(accept: Accept) -> Self {
        Self {
            accept,
            program_dir: PathBuf::from("/srv/trident/bin"),
            attempts: RefCell::new(Vec::new()),
        }
    }
}

impl Linker for RecordingLinker {
    type Handle = Vec<u8>;

    fn open_by_name(&self, name: &str) -> Result<Vec<u8>, BoxError> {
        self.attempts.borrow_mut().push("system");
        if self.accept == Accept::SystemSearch {
            Ok(Vec::new())
        } else {
            Err(format!("{name}: not on library path").into())
        }
    }

    fn open_path(&self, path: &Path) -> Result<Vec<u8>, BoxError> {
        if path.starts_with(&self.program_dir) {
            self.attempts.borrow_mut().push("program_dir");
            return if self.accept == Accept::ProgramDir {
                Ok(Vec::new())
            } else {
                Err(format!("{}: cannot open shared object file", path.display()).into())
            };
        }
        self.attempts.borrow_mut().push("extracted");
        let bytes = std::fs::read(path)?;
        if self.accept == Accept::Extracted {
            Ok(bytes)
        } else {
            Err("wrong ELF class: ELFCLASS32".into())
        }
    }
}

fn loader(accept: Accept, platform: Platform) -> NativeLoader<RecordingLinker> {
    let bundle = StaticBundle::new()
        .with("libtrident-core.so", b"native-unix")
        .with("trident-core.dll", b"native-windows");
    NativeLoader::with_linker(RecordingLinker::new(accept))
        .with_platform(platform)
        .with_resources(bundle)
        .with_locator(|| Ok(PathBuf::from("/srv/trident/bin/app")))
        .with_temp_prefix("Trident-tmp")
}

fn attempts(loader: &NativeLoader<RecordingLinker>) -> Vec<&'static str> {
    loader.linker().attempts.borrow().clone()
}

#[test]
fn system_search_success_skips_other_strategies() {
    let linker = RecordingLinker::new(Accept::SystemSearch);
    let l = NativeLoader::with_linker(linker).with_platform(Platform::Unix);
    let lib = l.load_library("trident-core").unwrap();
    assert_eq!(lib.origin, LoadOrigin::SystemSearch);
    assert_eq!(attempts(&l), vec!["system"]);
}

#[test]
fn program_dir_success_skips_extraction() {
    let l = loader(Accept::ProgramDir, Platform::Unix);
    let lib = l.load_library("trident-core").unwrap();
    assert_eq!(
        lib.origin,
        LoadOrigin::ProgramDir(PathBuf::from("/srv/trident/bin/libtrident-core.so"))
    );
    assert_eq!(attempts(&l), vec!["system", "program_dir"]);
    assert!(l.deferred_cleanup().pending().is_empty());
}

#[test]
fn extraction_on_unix_deletes_temp_copy() {
    let l = loader(Accept::Extracted, Platform::Unix);
    let lib = l.load_library("trident-core").unwrap();

    assert_eq!(lib.handle, b"native-unix");
    assert_eq!(attempts(&l), vec!["system", "program_dir", "extracted"]);
    let LoadOrigin::Extracted(path) = &lib.origin else {
        panic!("expected extracted origin, got {:?}", lib.origin);
    };
    assert!(path.ends_with("libtrident-core.so"));
    let dir = path.parent().unwrap();
    assert!(dir.file_name().unwrap().to_string_lossy().starts_with("Trident-tmp"));
    assert!(!path.exists(), "extracted file should be removed");
    assert!(!dir.exists(), "extraction dir should be removed");
    assert!(l.deferred_cleanup().pending().is_empty());
}

#[test]
fn extraction_on_windows_keeps_temp_copy() {
    let l = loader(Accept::Extracted, Platform::Windows);
    let lib = l.load_library("trident-core").unwrap();

    assert_eq!(lib.handle, b"native-windows");
    let LoadOrigin::Extracted(path) = lib.origin.clone() else {
        panic!("expected extracted origin");
    };
    assert!(path.ends_with("trident-core.dll"));
    assert!(path.exists(), "file must survive the load on windows");
    let dir = path.parent().unwrap().to_path_buf();
    assert_eq!(l.deferred_cleanup().pending(), vec![dir.clone()]);

    assert_eq!(l.deferred_cleanup().run(), 1);
    assert!(!dir.exists());
}

#[test]
fn all_strategies_failing_surfaces_last_cause() {
    let l = loader(Accept::Nothing, Platform::Unix);
    let err = l.load_library("trident-core").unwrap_err();

    assert_eq!(err.kind(), LoadErrorKind::Link);
    assert_eq!(err.library(), "trident-core");
    assert!(err.to_string().contains("trident-core"));
    let cause = err.source().expect("cause chained");
    assert_eq!(cause.to_string(), "wrong ELF class: ELFCLASS32");
    assert_eq!(err.root_cause().unwrap().to_string(), "wrong ELF class: ELFCLASS32");
}

#[test]
fn failed_extracted_load_still_cleans_up_on_unix() {
    let l = loader(Accept::Nothing, Platform::Unix);
    let _ = l.load_library("trident-core").unwrap_err();
    assert!(l.deferred_cleanup().pending().is_empty());
}

#[test]
fn absent_everywhere_yields_one_error_naming_library() {
    let l = loader(Accept::Nothing, Platform::Unix);
    let err = l.load_library("trident-web").unwrap_err();

    assert_eq!(err.kind(), LoadErrorKind::ResourceMissing);
    assert_eq!(err.library(), "trident-web");
    assert!(err.to_string().starts_with("while loading trident-web: "));
    assert_eq!(attempts(&l), vec!["system", "program_dir"]);
}

#[test]
fn program_location_failure_is_reported_as_load_error() {
    let l = NativeLoader::with_linker(RecordingLinker::new(Accept::Extracted))
        .with_platform(Platform::Unix)
        .with_resources(StaticBundle::new().with("libtrident-core.so", b"x"))
        .with_locator(|| Err(std::io::Error::other("code source unavailable")));
    let err = l.load_library("trident-core").unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::ProgramLocation);
    assert!(err.to_string().contains("trident-core"));
    assert_eq!(attempts(&l), vec!["system"]);
}
