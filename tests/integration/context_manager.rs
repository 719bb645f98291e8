//! ContextManager behavior against deterministic tier fakes

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use strata::memory::{ContextManager, SessionConfig};
use strata::tiers::{ExtensionLoader, StaticInstructions, TierSource};
use strata::types::{MemoryFile, Tier, TierFiles};
use strata::ApiError;

/// Canned tier loader; JIT answers are keyed by accessed path
#[derive(Default)]
struct CannedTiers {
    global: Vec<MemoryFile>,
    extension: Vec<MemoryFile>,
    environment: Vec<MemoryFile>,
    jit: Vec<(PathBuf, Vec<MemoryFile>)>,
    fail_extension: AtomicBool,
    calls: Mutex<Vec<Tier>>,
    jit_seen_registry: Mutex<Vec<usize>>,
}

impl CannedTiers {
    fn calls(&self) -> Vec<Tier> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TierSource for CannedTiers {
    async fn load_global(&self, _debug: bool) -> Result<TierFiles, ApiError> {
        self.calls.lock().push(Tier::Global);
        Ok(TierFiles::new(self.global.clone()))
    }

    async fn load_extension(
        &self,
        _extensions: &dyn ExtensionLoader,
        _debug: bool,
    ) -> Result<TierFiles, ApiError> {
        self.calls.lock().push(Tier::Extension);
        if self.fail_extension.load(Ordering::SeqCst) {
            return Err(ApiError::loader(Tier::Extension, "permission denied"));
        }
        Ok(TierFiles::new(self.extension.clone()))
    }

    async fn load_environment(
        &self,
        _directories: &[PathBuf],
        _extensions: &dyn ExtensionLoader,
        _debug: bool,
    ) -> Result<TierFiles, ApiError> {
        self.calls.lock().push(Tier::Project);
        Ok(TierFiles::new(self.environment.clone()))
    }

    async fn load_jit(
        &self,
        accessed_path: &Path,
        _trusted_roots: &[PathBuf],
        already_loaded: &HashSet<PathBuf>,
        _debug: bool,
    ) -> Result<TierFiles, ApiError> {
        self.calls.lock().push(Tier::Jit);
        self.jit_seen_registry.lock().push(already_loaded.len());
        let files = self
            .jit
            .iter()
            .find(|(path, _)| path == accessed_path)
            .map(|(_, files)| files.clone())
            .unwrap_or_default();
        Ok(TierFiles::new(files))
    }
}

fn file(path: &str, content: &str) -> MemoryFile {
    MemoryFile::new(path, content)
}

fn manager(source: Arc<CannedTiers>, trusted: bool) -> ContextManager {
    let config = SessionConfig::new("/work").with_trusted(trusted);
    ContextManager::new(Arc::new(config), source)
}

fn paths(items: &[&str]) -> BTreeSet<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

#[tokio::test]
async fn test_end_to_end_refresh() {
    let source = Arc::new(CannedTiers {
        global: vec![file("/g/INSTRUCTIONS", "Be helpful.")],
        environment: vec![file("/proj/INSTRUCTIONS", "Use TS.")],
        ..CannedTiers::default()
    });
    let manager = manager(source, true);
    let events = manager.subscribe();

    manager.refresh().await.unwrap();

    assert_eq!(manager.global_memory(), "Be helpful.");
    assert_eq!(manager.extension_memory(), "");
    assert_eq!(manager.environment_memory(), "Use TS.");
    assert_eq!(
        manager.loaded_paths(),
        paths(&["/g/INSTRUCTIONS", "/proj/INSTRUCTIONS"])
    );
    assert_eq!(
        manager.combined_memory(),
        "--- Global ---\n\nBe helpful.\n\n--- Project ---\n\nUse TS."
    );

    let event = events.try_recv().unwrap();
    assert_eq!(event.file_count, 2);
    assert!(events.try_recv().is_err(), "exactly one notification per refresh");
}

#[tokio::test]
async fn test_refresh_loads_tiers_in_order() {
    let source = Arc::new(CannedTiers::default());
    let manager = manager(source.clone(), true);

    manager.refresh().await.unwrap();

    assert_eq!(source.calls(), vec![Tier::Global, Tier::Extension, Tier::Project]);
}

#[tokio::test]
async fn test_refresh_is_idempotent() {
    let source = Arc::new(CannedTiers {
        global: vec![file("/g/A.md", "global")],
        extension: vec![file("/ext/B.md", "extension")],
        environment: vec![file("/proj/C.md", "project")],
        ..CannedTiers::default()
    });
    let manager = manager(source, true);

    manager.refresh().await.unwrap();
    let first = (manager.memory(), manager.loaded_paths());
    manager.refresh().await.unwrap();
    let second = (manager.memory(), manager.loaded_paths());

    assert_eq!(first, second);
    assert_eq!(manager.loaded_path_count(), 3);
}

#[tokio::test]
async fn test_refresh_drops_paths_from_earlier_jit_discovery() {
    let source = Arc::new(CannedTiers {
        global: vec![file("/g/A.md", "global")],
        jit: vec![(PathBuf::from("/work/src"), vec![file("/work/src/A.md", "local")])],
        ..CannedTiers::default()
    });
    let manager = manager(source, true);

    manager.refresh().await.unwrap();
    manager
        .discover_context(Path::new("/work/src"), &[PathBuf::from("/work")])
        .await
        .unwrap();
    assert_eq!(manager.loaded_path_count(), 2);

    manager.refresh().await.unwrap();
    assert_eq!(manager.loaded_paths(), paths(&["/g/A.md"]));
}

#[tokio::test]
async fn test_untrusted_workspace_skips_project_tier() {
    let source = Arc::new(CannedTiers {
        global: vec![file("/g/A.md", "global")],
        environment: vec![file("/proj/A.md", "secret project rules")],
        jit: vec![(PathBuf::from("/proj/src"), vec![file("/proj/src/A.md", "jit")])],
        ..CannedTiers::default()
    });
    let manager = manager(source.clone(), false);
    let events = manager.subscribe();

    manager.refresh().await.unwrap();
    assert_eq!(manager.environment_memory(), "");
    assert_eq!(manager.loaded_paths(), paths(&["/g/A.md"]));
    assert_eq!(events.try_recv().unwrap().file_count, 1);

    let discovered = manager
        .discover_context(Path::new("/proj/src"), &[PathBuf::from("/proj")])
        .await
        .unwrap();
    assert_eq!(discovered, "");
    assert_eq!(manager.loaded_path_count(), 1);
    assert!(!source.calls().contains(&Tier::Project));
    assert!(!source.calls().contains(&Tier::Jit));
}

#[tokio::test]
async fn test_supplemental_instructions_follow_project_memory() {
    let source = Arc::new(CannedTiers {
        environment: vec![file("/proj/A.md", "Use TS.")],
        ..CannedTiers::default()
    });
    let config = SessionConfig::new("/work")
        .with_trusted(true)
        .with_instructions(Arc::new(StaticInstructions::new("\n\nRun tests before committing.")));
    let manager = ContextManager::new(Arc::new(config), source);

    manager.refresh().await.unwrap();
    assert_eq!(
        manager.environment_memory(),
        "Use TS.\n\nRun tests before committing."
    );
}

#[tokio::test]
async fn test_supplemental_instructions_alone() {
    let source = Arc::new(CannedTiers::default());
    let config = SessionConfig::new("/work")
        .with_trusted(true)
        .with_instructions(Arc::new(StaticInstructions::new("Be terse.")));
    let manager = ContextManager::new(Arc::new(config), source);

    manager.refresh().await.unwrap();
    assert_eq!(manager.environment_memory(), "Be terse.");
    assert_eq!(manager.combined_memory(), "Be terse.");
}

#[tokio::test]
async fn test_loader_failure_aborts_refresh_without_notification() {
    let source = Arc::new(CannedTiers {
        global: vec![file("/g/A.md", "global")],
        environment: vec![file("/proj/A.md", "project")],
        fail_extension: AtomicBool::new(true),
        ..CannedTiers::default()
    });
    let manager = manager(source.clone(), true);
    let events = manager.subscribe();

    let err = manager.refresh().await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::LoaderFailed {
            tier: Tier::Extension,
            ..
        }
    ));
    assert_eq!(source.calls(), vec![Tier::Global, Tier::Extension]);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_state() {
    let source = Arc::new(CannedTiers {
        global: vec![file("/g/A.md", "global rules")],
        environment: vec![file("/work/INSTRUCTIONS", "project rules")],
        jit: vec![(
            PathBuf::from("/work/src"),
            vec![file("/work/INSTRUCTIONS", "project rules")],
        )],
        ..CannedTiers::default()
    });
    let manager = manager(source.clone(), true);
    let events = manager.subscribe();

    manager.refresh().await.unwrap();
    let before = (manager.memory(), manager.loaded_paths());
    assert_eq!(events.try_recv().unwrap().file_count, 2);

    source.fail_extension.store(true, Ordering::SeqCst);
    assert!(manager.refresh().await.is_err());
    assert_eq!((manager.memory(), manager.loaded_paths()), before);
    assert!(events.try_recv().is_err());

    let discovered = manager
        .discover_context(Path::new("/work/src"), &[PathBuf::from("/work")])
        .await
        .unwrap();
    assert_eq!(discovered, "");
    assert_eq!(manager.loaded_path_count(), 2);
}

#[tokio::test]
async fn test_discover_context_deduplicates_across_calls() {
    let shared = file("/work/INSTRUCTIONS", "Shared rules.");
    let source = Arc::new(CannedTiers {
        jit: vec![
            (
                PathBuf::from("/work/a"),
                vec![shared.clone(), file("/work/a/INSTRUCTIONS", "A rules.")],
            ),
            (
                PathBuf::from("/work/b"),
                vec![shared.clone(), file("/work/b/INSTRUCTIONS", "B rules.")],
            ),
        ],
        ..CannedTiers::default()
    });
    let manager = manager(source.clone(), true);
    let events = manager.subscribe();
    let roots = vec![PathBuf::from("/work")];

    let first = manager
        .discover_context(Path::new("/work/a"), &roots)
        .await
        .unwrap();
    assert!(first.contains("Shared rules."));
    assert!(first.contains("A rules."));

    let second = manager
        .discover_context(Path::new("/work/b"), &roots)
        .await
        .unwrap();
    assert_eq!(second, "B rules.");
    assert_eq!(manager.loaded_path_count(), 3);
    assert_eq!(*source.jit_seen_registry.lock(), vec![0, 2]);

    assert!(events.try_recv().is_err(), "discovery never notifies");
}

#[tokio::test]
async fn test_discover_context_skips_session_files() {
    let source = Arc::new(CannedTiers {
        environment: vec![file("/work/INSTRUCTIONS", "Project rules.")],
        jit: vec![(
            PathBuf::from("/work/src"),
            vec![file("/work/INSTRUCTIONS", "Project rules.")],
        )],
        ..CannedTiers::default()
    });
    let manager = manager(source, true);
    manager.refresh().await.unwrap();

    let discovered = manager
        .discover_context(Path::new("/work/src"), &[PathBuf::from("/work")])
        .await
        .unwrap();
    assert_eq!(discovered, "");
    assert_eq!(manager.loaded_path_count(), 1);
}

#[tokio::test]
async fn test_discovery_does_not_change_session_tiers() {
    let source = Arc::new(CannedTiers {
        global: vec![file("/g/A.md", "global")],
        jit: vec![(PathBuf::from("/work/src"), vec![file("/work/src/A.md", "local")])],
        ..CannedTiers::default()
    });
    let manager = manager(source, true);
    manager.refresh().await.unwrap();
    let before = manager.combined_memory();

    manager
        .discover_context(Path::new("/work/src"), &[PathBuf::from("/work")])
        .await
        .unwrap();
    assert_eq!(manager.combined_memory(), before);
}

#[tokio::test]
async fn test_accessors_never_load() {
    let source = Arc::new(CannedTiers {
        global: vec![file("/g/A.md", "global")],
        ..CannedTiers::default()
    });
    let manager = manager(source.clone(), true);

    assert_eq!(manager.global_memory(), "");
    assert_eq!(manager.combined_memory(), "");
    assert!(manager.loaded_paths().is_empty());
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn test_concurrent_discoveries_register_once() {
    let shared = file("/work/INSTRUCTIONS", "Shared rules.");
    let source = Arc::new(CannedTiers {
        jit: vec![
            (PathBuf::from("/work/a"), vec![shared.clone()]),
            (PathBuf::from("/work/b"), vec![shared.clone()]),
        ],
        ..CannedTiers::default()
    });
    let manager = Arc::new(manager(source, true));
    let roots = vec![PathBuf::from("/work")];

    let (a, b) = tokio::join!(
        manager.discover_context(Path::new("/work/a"), &roots),
        manager.discover_context(Path::new("/work/b"), &roots),
    );
    let results = [a.unwrap(), b.unwrap()];

    assert_eq!(
        results.iter().filter(|r| r.as_str() == "Shared rules.").count(),
        1
    );
    assert_eq!(results.iter().filter(|r| r.is_empty()).count(), 1);
    assert_eq!(manager.loaded_path_count(), 1);
}

#[tokio::test]
async fn test_multiple_subscribers_each_receive_notification() {
    let source = Arc::new(CannedTiers {
        global: vec![file("/g/A.md", "global")],
        ..CannedTiers::default()
    });
    let manager = manager(source, true);
    let first = manager.subscribe();
    let second = manager.subscribe();

    manager.refresh().await.unwrap();
    manager.refresh().await.unwrap();

    assert_eq!(first.try_iter().count(), 2);
    assert_eq!(second.try_iter().map(|e| e.file_count).collect::<Vec<_>>(), vec![1, 1]);
}
