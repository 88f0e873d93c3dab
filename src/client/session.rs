use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use std::time::SystemTime;

/// 会话存储中保存登录令牌的键
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// 本地会话存储，同步读取
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// 内存会话存储
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.set(AUTH_TOKEN_KEY, token);
        store
    }

    pub fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

/// 文件会话存储
///
/// 文件内容是一个 JSON 对象。读取时先比较修改时间和长度，变化后才重新加载，
/// 文件缺失或格式错误视为空。
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    loaded: RwLock<Option<Snapshot>>,
}

#[derive(Debug)]
struct Snapshot {
    modified: SystemTime,
    len: u64,
    entries: HashMap<String, serde_json::Value>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: RwLock::new(None),
        }
    }

    fn read_entries(&self) -> HashMap<String, serde_json::Value> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return HashMap::new(),
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed session file {:?}: {}", self.path, e);
            HashMap::new()
        })
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        let (modified, len) = match std::fs::metadata(&self.path) {
            // 不支持修改时间的平台只比较长度
            Ok(meta) => (
                meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                meta.len(),
            ),
            Err(_) => {
                *self.loaded.write().unwrap_or_else(|e| e.into_inner()) = None;
                return None;
            }
        };

        {
            let loaded = self.loaded.read().unwrap_or_else(|e| e.into_inner());
            if let Some(snapshot) = loaded.as_ref() {
                if snapshot.modified == modified && snapshot.len == len {
                    return as_string(snapshot.entries.get(key));
                }
            }
        }

        tracing::debug!("Reloading session file {:?}", self.path);
        let entries = self.read_entries();
        let value = as_string(entries.get(key));
        *self.loaded.write().unwrap_or_else(|e| e.into_inner()) = Some(Snapshot {
            modified,
            len,
            entries,
        });
        value
    }
}

fn as_string(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
