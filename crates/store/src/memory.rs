//! In-process document store backed by a JSON tree and watch channels.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::{DocumentStore, PushKey, ResultStore, StoreError, Subscription};

/// Shared in-memory store. Cloning yields another handle on the same data,
/// so every "client" in one process observes the same documents, the same
/// way separate clients of one remote database would.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    root: Map<String, Value>,
    watchers: Vec<Watcher>,
    seq: u64,
}

#[derive(Debug)]
struct Watcher {
    path: Vec<String>,
    tx: watch::Sender<Option<Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the current value at a path without subscribing. Test helper;
    /// a real remote backend only exposes listeners.
    pub fn snapshot(&self, path: &str) -> ResultStore<Option<Value>> {
        let segments = split(path)?;
        let inner = self.lock();
        Ok(get_at(&inner.root, &segments).cloned())
    }

    /// Number of live subscriptions (dropped ones are pruned first).
    pub fn active_subscriptions(&self) -> usize {
        let mut inner = self.lock();
        inner.watchers.retain(|w| !w.tx.is_closed());
        inner.watchers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, path: &str, apply: impl FnOnce(&mut Inner, &[String]) -> ResultStore<()>) -> ResultStore<()> {
        let segments = split(path)?;
        let mut inner = self.lock();
        apply(&mut inner, &segments)?;
        notify(&mut inner, &segments);
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn subscribe(&self, path: &str) -> Subscription {
        let segments = match split(path) {
            Ok(segments) => segments,
            Err(err) => {
                // Invalid paths never produce data; the listener simply sees
                // an absent value forever.
                tracing::warn!(path, %err, "subscribing to invalid path");
                let (_tx, rx) = watch::channel(None);
                return Subscription::new(rx);
            }
        };
        let mut inner = self.lock();
        let initial = get_at(&inner.root, &segments).cloned();
        let (tx, rx) = watch::channel(initial);
        inner.watchers.retain(|w| !w.tx.is_closed());
        inner.watchers.push(Watcher { path: segments, tx });
        Subscription::new(rx)
    }

    fn generate_key(&self, _path: &str) -> PushKey {
        let mut inner = self.lock();
        inner.seq += 1;
        PushKey {
            // Zero-padded so lexicographic order equals allocation order.
            key: format!("{:012}", inner.seq),
            order: inner.seq,
        }
    }

    async fn set(&self, path: &str, value: Value) -> ResultStore<()> {
        self.write(path, |inner, segments| set_at(&mut inner.root, segments, value))
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> ResultStore<()> {
        self.write(path, |inner, segments| {
            let slot = ensure_object(&mut inner.root, segments)?;
            for (key, value) in fields {
                slot.insert(key, value);
            }
            Ok(())
        })
    }

    async fn push(&self, path: &str, value: Value) -> ResultStore<PushKey> {
        let key = self.generate_key(path);
        let child = format!("{}/{}", path.trim_matches('/'), key.key);
        self.set(&child, value).await?;
        Ok(key)
    }

    async fn remove(&self, path: &str) -> ResultStore<()> {
        self.write(path, |inner, segments| {
            remove_at(&mut inner.root, segments);
            Ok(())
        })
    }
}

fn split(path: &str) -> ResultStore<Vec<String>> {
    let segments: Vec<String> = path
        .trim_matches('/')
        .split('/')
        .map(str::to_string)
        .collect();
    if segments.is_empty() || segments.iter().any(String::is_empty) {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

fn get_at<'a>(root: &'a Map<String, Value>, segments: &[String]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut value = root.get(first)?;
    for segment in rest {
        value = value.as_object()?.get(segment)?;
    }
    Some(value)
}

/// Navigates to the object at `segments`, creating intermediate objects.
fn ensure_object<'a>(
    root: &'a mut Map<String, Value>,
    segments: &[String],
) -> ResultStore<&'a mut Map<String, Value>> {
    let mut current = root;
    for (depth, segment) in segments.iter().enumerate() {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        current = slot
            .as_object_mut()
            .ok_or_else(|| StoreError::NotAnObject(segments[..=depth].join("/")))?;
    }
    Ok(current)
}

fn set_at(root: &mut Map<String, Value>, segments: &[String], value: Value) -> ResultStore<()> {
    // split cannot return an empty segment list.
    let (last, parents) = match segments.split_last() {
        Some(parts) => parts,
        None => return Err(StoreError::InvalidPath(String::new())),
    };
    let parent = ensure_object(root, parents)?;
    parent.insert(last.clone(), value);
    Ok(())
}

fn remove_at(root: &mut Map<String, Value>, segments: &[String]) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = root;
    for segment in parents {
        match current.get_mut(segment).and_then(Value::as_object_mut) {
            Some(next) => current = next,
            None => return,
        }
    }
    current.remove(last);
}

/// Re-delivers snapshots to every watcher whose path overlaps the write:
/// listeners at or below the written path, and listeners on any ancestor
/// collection.
fn notify(inner: &mut Inner, changed: &[String]) {
    inner.watchers.retain(|w| !w.tx.is_closed());
    let root = &inner.root;
    for watcher in &inner.watchers {
        let overlap = watcher
            .path
            .iter()
            .zip(changed.iter())
            .all(|(a, b)| a == b);
        if overlap {
            watcher.tx.send_replace(get_at(root, &watcher.path).cloned());
        }
    }
}
