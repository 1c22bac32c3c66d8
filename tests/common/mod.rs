// 集成测试公共模块
//
// 提供一个最小的本地 HTTP 服务，用于模拟资源服务器和代理

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use assetrev::utils::Url;

/// 一条固定的响应
#[derive(Clone)]
pub struct Route {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Route {
    pub fn ok(body: &str) -> Self {
        Route {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Route {
            status,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// 本地 HTTP 服务
///
/// 按路径匹配路由；代理形式的请求（`GET http://host/path`）按其中的路径匹配。
/// 每个请求行中的目标都会被记录下来。
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn start(routes: &[(&str, Route)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Arc<HashMap<String, Route>> = Arc::new(
            routes
                .iter()
                .map(|(path, route)| (path.to_string(), route.clone()))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(handle(socket, routes.clone(), recorded.clone()));
            }
        });

        StubServer { addr, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// 收到的请求目标，按到达顺序
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(
    mut socket: TcpStream,
    routes: Arc<HashMap<String, Route>>,
    requests: Arc<Mutex<Vec<String>>>,
) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    while !buf.windows(4).any(|window| window == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    requests.lock().unwrap().push(target.clone());

    let path = match Url::parse(&target) {
        Ok(url) => url.path().to_string(),
        Err(_) => target,
    };
    let route = routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| Route::status(404));

    if !route.delay.is_zero() {
        tokio::time::sleep(route.delay).await;
    }

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        route.status,
        if route.status < 400 { "OK" } else { "Error" },
        route.body.len(),
        route.body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}
