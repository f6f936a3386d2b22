use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::ProxySettings;
use crate::directive::PlaybackDirective;
use crate::error::ResolveError;
use crate::media::{FileSource, LocalResourceTable, ResourceRef, ResourceRegistry, SelectedFile};
use crate::resolver::{SourceResolver, resolve_url};

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Create(String),
        Release(String),
    }

    /// Registry that records every call and can be told to fail
    #[derive(Default)]
    struct RecordingRegistry {
        table: LocalResourceTable,
        events: Mutex<Vec<Event>>,
        fail_next: Mutex<bool>,
    }

    impl RecordingRegistry {
        fn events(&self) -> Vec<Event> {
            self.events.lock().clone()
        }

        fn releases(&self) -> usize {
            self.events()
                .iter()
                .filter(|e| matches!(e, Event::Release(_)))
                .count()
        }
    }

    impl ResourceRegistry for RecordingRegistry {
        fn create(&self, file: &SelectedFile) -> Result<ResourceRef, ResolveError> {
            if std::mem::take(&mut *self.fail_next.lock()) {
                return Err(ResolveError::ResourceUnavailable {
                    name: file.name.clone(),
                    reason: "table full".to_string(),
                });
            }
            self.events.lock().push(Event::Create(file.name.clone()));
            self.table.create(file)
        }

        fn release(&self, handle: &ResourceRef) {
            self.events.lock().push(Event::Release(handle.url().to_string()));
            self.table.release(handle);
        }

        fn lookup(&self, handle: &ResourceRef) -> Option<FileSource> {
            self.table.lookup(handle)
        }
    }

    fn proxy() -> ProxySettings {
        ProxySettings::default()
    }

    fn setup() -> (SourceResolver, Arc<RecordingRegistry>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let registry = Arc::new(RecordingRegistry::default());
        let resolver = SourceResolver::new(registry.clone(), proxy());
        (resolver, registry)
    }

    fn video(name: &str) -> SelectedFile {
        SelectedFile::from_bytes(name, vec![0u8; 16])
    }

    #[test]
    fn test_initial_state() {
        let (resolver, registry) = setup();
        assert!(resolver.directive().is_empty());
        assert_eq!(resolver.url_input(), "");
        assert_eq!(resolver.referrer_input(), "");
        assert_eq!(resolver.proxy_base(), "http://localhost:4000");
        assert!(resolver.use_proxy());
        assert!(resolver.active_handle().is_none());
        assert!(registry.events().is_empty());
    }

    #[test]
    fn test_youtube_short_link() {
        let (mut resolver, _) = setup();
        let directive = resolver.load_from_url("https://youtu.be/dQw4w9WgXcQ", "", true, "http://localhost:4000");
        assert_eq!(directive, &PlaybackDirective::youtube("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_youtube_wins_over_proxy() {
        let directive = resolve_url("  https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=1 ", "https://ref.example", &proxy());
        assert_eq!(directive, Some(PlaybackDirective::youtube("dQw4w9WgXcQ")));
    }

    #[test]
    fn test_hls_through_proxy_with_referrer() {
        let (mut resolver, _) = setup();
        let directive = resolver.load_from_url("video.m3u8", "https://ref.example", true, "http://localhost:4000");
        assert_eq!(
            directive,
            &PlaybackDirective::RemoteStream {
                url: "http://localhost:4000/hls?url=video.m3u8&referer=https%3A%2F%2Fref.example".to_string(),
                proxied: true,
            }
        );
    }

    #[test]
    fn test_progressive_through_proxy() {
        let (mut resolver, _) = setup();
        let directive = resolver.load_from_url("https://cdn.example/clip.mp4", "", true, "http://relay:9000");
        assert_eq!(
            directive,
            &PlaybackDirective::RemoteStream {
                url: "http://relay:9000/proxy?url=https%3A%2F%2Fcdn.example%2Fclip.mp4".to_string(),
                proxied: true,
            }
        );
    }

    #[test]
    fn test_whitespace_referrer_is_omitted() {
        let directive = resolve_url("https://cdn.example/master.m3u8", " \t ", &proxy());
        match directive {
            Some(PlaybackDirective::RemoteStream { url, proxied }) => {
                assert!(proxied);
                assert!(url.starts_with("http://localhost:4000/hls?url="));
                assert!(!url.contains("referer="));
            }
            other => panic!("unexpected directive: {:?}", other),
        }
    }

    #[test]
    fn test_without_proxy_passes_url_through() {
        let inputs = [
            "https://cdn.example/master.m3u8?token=abc",
            "https://cdn.example/clip.mp4",
            "not even a url",
        ];
        for input in inputs {
            let (mut resolver, _) = setup();
            let directive = resolver.load_from_url(input, "https://ref.example", false, "http://localhost:4000");
            assert_eq!(
                directive,
                &PlaybackDirective::RemoteStream {
                    url: input.to_string(),
                    proxied: false,
                }
            );
        }
    }

    #[test]
    fn test_blank_url_is_noop() {
        let (mut resolver, _) = setup();
        resolver.load_from_url("https://cdn.example/clip.mp4", "", false, "");
        let before = resolver.directive().clone();

        resolver.load_from_url("   ", "https://ref.example", true, "http://localhost:4000");
        assert_eq!(resolver.directive(), &before);

        let (mut fresh, _) = setup();
        fresh.load_from_url("", "", true, "http://localhost:4000");
        assert!(fresh.directive().is_empty());
    }

    #[test]
    fn test_load_uses_current_inputs() {
        let (mut resolver, _) = setup();
        resolver.set_url_input("https://cdn.example/clip.webm");
        resolver.set_referrer_input("https://ref.example");
        resolver.set_use_proxy(false);
        assert_eq!(resolver.load().source_url(), Some("https://cdn.example/clip.webm"));

        resolver.set_use_proxy(true);
        resolver.set_proxy_base("http://127.0.0.1:4000");
        assert_eq!(
            resolver.load().source_url(),
            Some("http://127.0.0.1:4000/proxy?url=https%3A%2F%2Fcdn.example%2Fclip.webm&referer=https%3A%2F%2Fref.example")
        );
    }

    #[test]
    fn test_file_replacement_releases_before_create() {
        let (mut resolver, registry) = setup();

        resolver.load_from_file(video("clip.mp4")).unwrap();
        let first = resolver.active_handle().cloned().unwrap();

        let directive = resolver.load_from_file(video("clip2.mp4")).unwrap().clone();
        let second = resolver.active_handle().cloned().unwrap();

        assert_eq!(
            registry.events(),
            vec![
                Event::Create("clip.mp4".to_string()),
                Event::Release(first.url().to_string()),
                Event::Create("clip2.mp4".to_string()),
            ]
        );
        assert_eq!(
            directive,
            PlaybackDirective::LocalFile {
                handle: second.clone(),
                name: "clip2.mp4".to_string(),
            }
        );
        assert_eq!(directive.source_url(), Some(second.url()));
        assert_eq!(registry.table.outstanding(), 1);
    }

    #[test]
    fn test_many_file_loads_keep_one_handle() {
        let (mut resolver, registry) = setup();
        for i in 0..10 {
            resolver.load_from_file(video(&format!("clip{}.mp4", i))).unwrap();
            assert_eq!(registry.table.outstanding(), 1);
        }
        assert_eq!(registry.releases(), 9);
    }

    #[test]
    fn test_unsupported_file_changes_nothing() {
        let (mut resolver, registry) = setup();
        resolver.load_from_file(video("clip.mp4")).unwrap();
        let before = resolver.directive().clone();

        let err = resolver.load_from_file(video("notes.txt")).unwrap_err();
        assert_eq!(err, ResolveError::UnsupportedFile { name: "notes.txt".to_string() });

        let err = resolver
            .load_from_file(SelectedFile::from_bytes("blank.mp4", Vec::<u8>::new()))
            .unwrap_err();
        assert!(matches!(err, ResolveError::EmptyFile { .. }));

        assert_eq!(resolver.directive(), &before);
        assert_eq!(registry.releases(), 0);
        assert_eq!(registry.table.outstanding(), 1);
    }

    #[test]
    fn test_registry_failure_never_leaves_dangling_directive() {
        let (mut resolver, registry) = setup();
        resolver.load_from_file(video("clip.mp4")).unwrap();

        *registry.fail_next.lock() = true;
        let err = resolver.load_from_file(video("clip2.mp4")).unwrap_err();
        assert!(matches!(err, ResolveError::ResourceUnavailable { .. }));

        assert!(resolver.directive().is_empty());
        assert!(resolver.active_handle().is_none());
        assert_eq!(registry.table.outstanding(), 0);
    }

    #[test]
    fn test_registry_failure_keeps_unrelated_directive() {
        let (mut resolver, registry) = setup();
        resolver.load_from_url("https://cdn.example/clip.mp4", "", false, "");

        *registry.fail_next.lock() = true;
        assert!(resolver.load_from_file(video("clip.mp4")).is_err());
        assert_eq!(resolver.directive().source_url(), Some("https://cdn.example/clip.mp4"));
    }

    #[test]
    fn test_url_load_keeps_local_handle() {
        let (mut resolver, registry) = setup();
        resolver.load_from_file(video("clip.mp4")).unwrap();
        let handle = resolver.active_handle().cloned().unwrap();

        resolver.load_from_url("dQw4w9WgXcQ", "", true, "http://localhost:4000");
        assert_eq!(resolver.directive().embed_id(), Some("dQw4w9WgXcQ"));
        assert_eq!(resolver.active_handle(), Some(&handle));
        assert_eq!(registry.releases(), 0);

        resolver.clear();
        assert_eq!(registry.events().last(), Some(&Event::Release(handle.url().to_string())));
        assert_eq!(registry.table.outstanding(), 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let (mut resolver, registry) = setup();
        resolver.load_from_url("https://cdn.example/clip.mp4", "https://ref.example", false, "http://relay:9000");
        resolver.load_from_file(video("clip.mp4")).unwrap();

        resolver.clear();
        assert!(resolver.directive().is_empty());
        assert_eq!(resolver.url_input(), "");
        assert_eq!(resolver.referrer_input(), "");
        assert_eq!(resolver.proxy_base(), "http://localhost:4000");
        assert!(resolver.use_proxy());
        assert!(resolver.active_handle().is_none());
        assert_eq!(registry.releases(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (mut resolver, registry) = setup();
        resolver.load_from_file(video("clip.mp4")).unwrap();

        resolver.clear();
        let events = registry.events();
        resolver.clear();

        assert!(resolver.directive().is_empty());
        assert_eq!(registry.events(), events);
        assert_eq!(registry.releases(), 1);
    }

    #[test]
    fn test_teardown_releases_handle() {
        let (mut resolver, registry) = setup();
        resolver.load_from_file(video("clip.mp4")).unwrap();
        resolver.teardown();

        assert_eq!(registry.releases(), 1);
        assert_eq!(registry.table.outstanding(), 0);
    }

    #[test]
    fn test_drop_releases_handle_once() {
        let registry = Arc::new(RecordingRegistry::default());
        {
            let mut resolver = SourceResolver::new(registry.clone(), proxy());
            resolver.load_from_file(video("clip.mp4")).unwrap();
            resolver.load_from_url("https://cdn.example/clip.mp4", "", true, "http://localhost:4000");
        }
        assert_eq!(registry.releases(), 1);
        assert_eq!(registry.table.outstanding(), 0);
    }

    #[test]
    fn test_teardown_on_empty_state() {
        let (resolver, registry) = setup();
        resolver.teardown();
        assert!(registry.events().is_empty());
    }

    #[test]
    fn test_shared_table_across_resolvers() {
        let table = Arc::new(LocalResourceTable::new());
        let mut a = SourceResolver::new(table.clone(), proxy());
        let mut b = SourceResolver::new(table.clone(), proxy());

        a.load_from_file(video("a.mp4")).unwrap();
        b.load_from_file(video("b.mp4")).unwrap();
        b.load_from_file(video("c.mp4")).unwrap();
        assert_eq!(table.outstanding(), 2);

        drop(a);
        assert_eq!(table.outstanding(), 1);
        b.teardown();
        assert_eq!(table.outstanding(), 0);
    }

    #[test]
    fn test_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.mkv");
        std::fs::write(&path, b"not really a movie").unwrap();

        let (mut resolver, registry) = setup();
        let directive = resolver.load_from_file(SelectedFile::from_path(&path)).unwrap().clone();
        let handle = directive.local_handle().cloned().unwrap();

        assert!(matches!(registry.lookup(&handle), Some(FileSource::Path(p)) if p == path));
        assert!(matches!(directive, PlaybackDirective::LocalFile { ref name, .. } if name == "movie.mkv"));
    }
}
