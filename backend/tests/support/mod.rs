use parking_lot::{const_mutex, Mutex};

/// Config tests mutate process-wide variables; one at a time.
static ENV_LOCK: Mutex<()> = const_mutex(());

/// Run `f` with the given variables set (`Some`) or removed (`None`),
/// restoring their previous values afterwards, even on panic.
#[allow(dead_code)]
pub fn with_scoped_env<R>(changes: &[(&str, Option<&str>)], f: impl FnOnce() -> R) -> R {
    let _lock = ENV_LOCK.lock();
    let _restore = EnvRestore::apply(changes);
    f()
}

/// Previous values of the variables a test touched.
struct EnvRestore(Vec<(String, Option<String>)>);

impl EnvRestore {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let mut saved: Vec<(String, Option<String>)> = Vec::with_capacity(changes.len());
        for (key, value) in changes {
            if !saved.iter().any(|(k, _)| k == key) {
                saved.push((key.to_string(), std::env::var(key).ok()));
            }
            set_or_remove(key, *value);
        }
        Self(saved)
    }
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (key, value) in self.0.drain(..).rev() {
            set_or_remove(&key, value.as_deref());
        }
    }
}

fn set_or_remove(key: &str, value: Option<&str>) {
    match value {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
#[cfg(feature = "http-server")]
#[allow(dead_code)]
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub server");
    let addr = listener.local_addr().expect("stub server address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{}", addr)
}

/// Base URL where nothing listens.
#[allow(dead_code)]
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind scratch port");
    let addr = listener.local_addr().expect("scratch port address");
    drop(listener);
    format!("http://{}", addr)
}
