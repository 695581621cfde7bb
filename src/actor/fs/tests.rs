use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::event::{CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use tempfile::TempDir;
use tokio::sync::mpsc;

use super::filter::is_temp_file;
use super::watch_roots::WatchRoots;
use super::*;
use crate::build::BuildTarget;
use crate::config::test_config_at;
use crate::module::{ModuleId, discover};

struct Fixture {
    _dir: TempDir,
    root: PathBuf,
    config: ProjectConfig,
    modules: Arc<ModuleSet>,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let root = normalize_path(dir.path());
    for module in ["modules/ns/foo", "modules/bar"] {
        fs::create_dir_all(root.join(module)).unwrap();
        fs::write(
            root.join(module).join("module.json"),
            r#"{"name":"m","version":"1.0.0"}"#,
        )
        .unwrap();
    }
    fs::create_dir_all(root.join("core")).unwrap();
    fs::create_dir_all(root.join("web")).unwrap();

    let config = test_config_at(&root, "[paths]\nmirror = \"mirror\"");
    let modules = Arc::new(discover(&config));
    Fixture {
        _dir: dir,
        root,
        config,
        modules,
    }
}

fn dispatcher(fx: &Fixture) -> (Dispatcher, mpsc::Receiver<BuildMsg>) {
    let (tx, rx) = mpsc::channel(16);
    (Dispatcher::new(&fx.config, Arc::clone(&fx.modules), tx), rx)
}

fn event(kind: EventKind, paths: &[PathBuf]) -> Event {
    Event {
        kind,
        paths: paths.to_vec(),
        attrs: Default::default(),
    }
}

fn modify() -> EventKind {
    EventKind::Modify(ModifyKind::Data(DataChange::Any))
}

fn module_key(ns: &str, name: &str) -> WatchKey {
    WatchKey::Target(BuildTarget::Module(ModuleId::new(ns, name)))
}

#[test]
fn test_routes_each_root() {
    let fx = fixture();
    let (dispatcher, _rx) = dispatcher(&fx);
    let route = |rel: &str| dispatcher.keys(&event(modify(), &[fx.root.join(rel)]));

    assert!(route("modules/ns/foo/server/index.ts").contains(&module_key("ns", "foo")));
    assert!(route("modules/ns/foo/ui/app.tsx").contains(&module_key("ns", "foo")));
    assert!(route("modules/bar/client/a.lua").contains(&module_key("", "bar")));
    assert!(route("core/server/db.ts").contains(&WatchKey::Target(BuildTarget::Foundation)));
    assert!(route("web/index.html").contains(&WatchKey::Target(BuildTarget::SharedFrontEnd)));
    assert!(route("mirror/foo/fxmanifest.lua").contains(&WatchKey::Mirror));
    assert!(route("README.md").is_empty());
}

#[test]
fn test_module_added_after_discovery_is_reported_once() {
    let fx = fixture();
    let (dispatcher, _rx) = dispatcher(&fx);
    let router = &dispatcher.router;
    let manifest = fx.root.join("modules/ns/baz/module.json");

    assert_eq!(
        router.new_module_root(&manifest),
        Some(fx.root.join("modules/ns/baz").as_path())
    );
    assert_eq!(router.new_module_root(&fx.root.join("modules/ns/foo/module.json")), None);
    assert_eq!(router.new_module_root(&fx.root.join("modules/ns/baz/server/a.ts")), None);
    assert_eq!(router.new_module_root(&fx.root.join("web/module.json")), None);

    assert!(dispatcher.keys(&event(modify(), &[manifest.clone()])).is_empty());
    assert!(dispatcher.keys(&event(modify(), &[manifest])).is_empty());
    assert_eq!(router.reported_count(), 1);
}

#[test]
fn test_ignored_paths_produce_no_key() {
    let fx = fixture();
    let (dispatcher, _rx) = dispatcher(&fx);
    let route = |rel: &str| dispatcher.keys(&event(modify(), &[fx.root.join(rel)]));

    assert!(route("dist/ns/foo/server/server.js").is_empty());
    assert!(route("modules/ns/foo/node_modules/x/index.js").is_empty());
    assert!(route("modules/ns/foo/.hotmod/stage/server/server.js").is_empty());
    assert!(route("modules/ns/foo/.git/HEAD").is_empty());
    assert!(route("modules/ns/foo/server/index.ts.swp").is_empty());
}

#[test]
fn test_metadata_only_events_ignored() {
    let fx = fixture();
    let (dispatcher, _rx) = dispatcher(&fx);
    let path = fx.root.join("modules/bar/client/a.lua");

    let metadata = EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime));
    assert!(dispatcher.keys(&event(metadata, &[path.clone()])).is_empty());
    assert!(dispatcher.keys(&event(EventKind::Access(notify::event::AccessKind::Any), &[path.clone()])).is_empty());
    assert_eq!(dispatcher.keys(&event(EventKind::Create(CreateKind::File), &[path.clone()])).len(), 1);
    assert_eq!(dispatcher.keys(&event(EventKind::Remove(RemoveKind::File), &[path])).len(), 1);
}

#[test]
fn test_one_event_many_paths() {
    let fx = fixture();
    let (dispatcher, _rx) = dispatcher(&fx);
    let paths = [
        fx.root.join("modules/bar/a.lua"),
        fx.root.join("modules/bar/b.lua"),
        fx.root.join("core/x.ts"),
    ];
    assert_eq!(dispatcher.keys(&event(modify(), &paths)).len(), 2);
}

#[test]
fn test_temp_files() {
    assert!(is_temp_file(Path::new("/p/a.ts~")));
    assert!(is_temp_file(Path::new("/p/.#a.ts")));
    assert!(is_temp_file(Path::new("/p/a.swp")));
    assert!(is_temp_file(Path::new("/p/4913")));
    assert!(!is_temp_file(Path::new("/p/index.ts")));
}

#[tokio::test(start_paused = true)]
async fn test_burst_fires_once_per_key() {
    let fx = fixture();
    let (dispatcher, mut rx) = dispatcher(&fx);
    let foo = fx.root.join("modules/ns/foo/server/index.ts");
    let core = fx.root.join("core/server/db.ts");

    for _ in 0..10 {
        dispatcher.dispatch(&event(modify(), &[foo.clone()]));
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    dispatcher.dispatch(&event(modify(), &[core]));

    tokio::time::sleep(Duration::from_millis(500)).await;

    let mut fired = Vec::new();
    while let Ok(BuildMsg::Fired(key)) = rx.try_recv() {
        fired.push(key);
    }
    assert_eq!(
        fired,
        vec![module_key("ns", "foo"), WatchKey::Target(BuildTarget::Foundation)]
    );
}

#[test]
fn test_watch_roots_attach_when_created() {
    let dir = TempDir::new().unwrap();
    let existing = dir.path().join("modules");
    let later = dir.path().join("web");
    fs::create_dir_all(&existing).unwrap();

    let mut watcher = notify::recommended_watcher(|_: notify::Result<Event>| {}).unwrap();
    let mut roots = WatchRoots::new(vec![existing, later.clone()]);
    assert!(roots.attach_existing(&mut watcher).is_empty());
    assert_eq!(roots.attached_count(), 1);

    fs::create_dir_all(&later).unwrap();
    roots.maintain(&mut watcher);
    assert_eq!(roots.attached_count(), 2);

    fs::remove_dir_all(&later).unwrap();
    roots.maintain(&mut watcher);
    assert_eq!(roots.attached_count(), 1);
}

#[tokio::test]
async fn test_actor_reports_real_change() {
    let fx = fixture();
    let (tx, mut rx) = mpsc::channel(16);
    let mut config = fx.config.clone();
    config.watch.debounce_ms = 50;

    let roots = vec![config.paths.modules.clone()];
    let actor = FsActor::new(roots, tx, &config, Arc::clone(&fx.modules)).unwrap();
    let handle = tokio::spawn(actor.run());

    // give the backend a moment to register the watch
    tokio::time::sleep(Duration::from_millis(200)).await;
    fs::create_dir_all(fx.root.join("modules/bar/server")).unwrap();
    fs::write(fx.root.join("modules/bar/server/index.ts"), "x").unwrap();

    let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no build fired")
        .unwrap();
    assert!(matches!(msg, BuildMsg::Fired(key) if key == module_key("", "bar")));

    drop(rx);
    handle.abort();
}
