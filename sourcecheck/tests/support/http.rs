use std::{
    io,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
};

/// 最初のN接続を応答せずに切断し、以降は固定のJSONを返すテスト用サーバー
///
/// wiremockでは再現できない通信途中の切断を確認するために使う。
#[allow(dead_code)]
pub struct FlakyServer {
    addr: SocketAddr,
    connections: Arc<AtomicUsize>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl FlakyServer {
    /// ベースURL（末尾スラッシュ付き）
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// 受け付けた接続数
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// サーバーを停止し、バックグラウンドタスクの終了を待つ
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = self.handle.await;
    }
}

/// 最初の`drop_first`接続を切断し、以降は`body`を200で返すサーバーを起動する
///
/// `drop_first`に`usize::MAX`を渡すと全接続を切断する。
#[allow(dead_code)]
pub async fn spawn_flaky_server(drop_first: usize, body: &str) -> FlakyServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = oneshot::channel();
    let body = body.to_string();

    let counter = Arc::clone(&connections);
    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = &mut rx => break,
                accepted = listener.accept() => {
                    let Ok((stream, _)) = accepted else { break };
                    let seen = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    let body = body.clone();
                    tokio::spawn(async move {
                        let _ = serve_connection(stream, seen <= drop_first, &body).await;
                    });
                }
            }
        }
    });

    FlakyServer {
        addr,
        connections,
        shutdown: Some(tx),
        handle,
    }
}

async fn serve_connection(mut stream: TcpStream, drop_it: bool, body: &str) -> io::Result<()> {
    read_request_head(&mut stream).await?;
    if drop_it {
        // 応答を返さずに切断する
        drop(stream);
        return Ok(());
    }

    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

async fn read_request_head(stream: &mut TcpStream) -> io::Result<()> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 512];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            return Ok(());
        }
    }
}

/// 接続を拒否されるベースURLを返す（一度バインドしたポートを解放する）
#[allow(dead_code)]
pub fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to reserve test port");
    let port = listener
        .local_addr()
        .expect("failed to read test port")
        .port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}
