//! アプリケーションのエントリポイントとランタイム初期化。

use anyhow::{Context, Result, anyhow, bail};
use std::{path::Path, sync::Arc};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use billed::{
    bills::{DisplayBill, NewBillForm},
    config::Config,
    events::UiEvent,
    routes,
    session::{FileStorage, Session},
    store::{ApiStore, BillsStore, LocalFile},
    worker::{self, WorkerCmd},
};

/// コマンドライン引数から決まる実行内容。
enum Command {
    /// 請求一覧を表示する。
    List,
    /// フォームファイルと添付ファイルから新規請求を送信する。
    New { form: String, attachment: String },
}

/// ファイルロギングを初期化し、非同期ガードを生存させる。
fn init_logging(log_file: &str) -> Result<WorkerGuard> {
    // 標準出力を一覧表示に使うため、ログはファイルへ直接書き込む。
    let file_appender = tracing_appender::rolling::never(".", log_file);
    // 非同期書き込み用のラッパーとガードを用意する。
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    // フォーマッタと出力先を設定して初期化する。
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;
    // ログの保存先を通知しておく。
    tracing::info!("logging to {}", log_file);
    Ok(guard)
}

/// 引数を解釈する（サブコマンドは `new` のみ）。
fn parse_args(args: &[String]) -> Result<Command> {
    match args {
        [] => Ok(Command::List),
        [cmd, form, attachment] if cmd == "new" => Ok(Command::New {
            form: form.clone(),
            attachment: attachment.clone(),
        }),
        _ => bail!("usage: billed [new <form.toml> <attachment>]"),
    }
}

/// 拡張子から添付ファイルのMIMEタイプを推定する。
fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// 添付ファイルを読み込む。
async fn read_attachment(path: &str) -> Result<LocalFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot read attachment {path}"))?;
    // 送信時はパスではなくファイル名だけを使う。
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    let content_type = content_type_for(&name);
    Ok(LocalFile::new(name, content_type, bytes))
}

/// フォーム入力値をTOMLから読み込む。
async fn read_form(path: &str) -> Result<NewBillForm> {
    let s = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read form {path}"))?;
    Ok(toml::from_str(&s)?)
}

/// 一覧を1行ずつ表示する（並び順はAPIのまま）。
fn print_bills(bills: &[DisplayBill]) {
    if bills.is_empty() {
        println!("(no bills)");
        return;
    }
    for b in bills {
        println!(
            "{:<12} {:<20} {:<24} {:>8} {}",
            b.date,
            b.field_str("type").unwrap_or("-"),
            b.field_str("name").unwrap_or("-"),
            b.fields
                .get("amount")
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".into()),
            b.status
        );
    }
}

/// ワーカーからのイベントを処理し、完了したら結果を返す。
async fn drive(cmd: Command, store: Arc<dyn BillsStore>, session: Session) -> Result<()> {
    // ワーカーとのコマンド／イベント用チャネルを用意する。
    let (tx_cmd, rx_cmd) = mpsc::channel::<WorkerCmd>(16);
    let (tx_ev, mut rx_ev) = mpsc::channel::<UiEvent>(64);
    tokio::spawn(worker::run(rx_cmd, tx_ev, store, session));

    // 実行内容に応じて最初のコマンドを送る。
    match cmd {
        Command::List => tx_cmd.send(WorkerCmd::RefreshBills).await?,
        Command::New { form, attachment } => {
            let form = read_form(&form).await?;
            let file = read_attachment(&attachment).await?;
            tx_cmd.send(WorkerCmd::OpenNewBill).await?;
            tx_cmd.send(WorkerCmd::ChangeFile(file)).await?;
            tx_cmd.send(WorkerCmd::Submit(form)).await?;
        }
    }

    // イベントを順に処理する。
    while let Some(ev) = rx_ev.recv().await {
        match ev {
            UiEvent::BillsLoaded(bills) => {
                print_bills(&bills);
                return Ok(());
            }
            UiEvent::Alert(msg) => eprintln!("{msg}"),
            UiEvent::FileAccepted { file_name } => println!("attached {file_name}"),
            UiEvent::Navigate(route) => {
                tracing::info!("navigate to {route}");
                // 一覧画面へ戻ったら一覧を再取得する。
                if route == routes::BILLS {
                    println!("bill submitted");
                    tx_cmd.send(WorkerCmd::RefreshBills).await?;
                }
            }
            UiEvent::Error(s) => bail!(s),
        }
    }
    Err(anyhow!("worker stopped unexpectedly"))
}

#[tokio::main]
/// エントリポイント：設定読み込み→ログ初期化→セッション取得→実行。
async fn main() -> Result<()> {
    // 設定を読み込む（初回はデフォルトを書き出す）。
    let cfg = Config::load_or_default(Path::new("config.toml"))?;
    // ロガーを初期化し、ガードを保持して書き込みを継続させる。
    let _log_guard = init_logging(&cfg.logging.file)?;
    tracing::info!("app starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cmd = parse_args(&args)?;

    // ローカルストレージからセッションを読み込む。
    let storage = FileStorage::new(&cfg.storage.path);
    let session = match Session::load(&storage).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("session error: {e}");
            bail!("{e}: log in first ({})", routes::LOGIN);
        }
    };
    // 一覧と新規作成は従業員向けの機能。
    if !session.is_employee() {
        bail!("bills are for employee accounts; admins use {}", routes::DASHBOARD);
    }

    let store = ApiStore::new(&cfg.api.base_url, session.jwt.clone(), cfg.api.timeout())?;
    let res = drive(cmd, Arc::new(store), session).await;
    // エラーがあればログに残す。
    if let Err(ref e) = res {
        tracing::error!("app error: {e}");
    }
    tracing::info!("app exiting");
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        assert!(matches!(parse_args(&[]).unwrap(), Command::List));
        let args = vec!["new".to_string(), "f.toml".to_string(), "a.png".to_string()];
        assert!(matches!(
            parse_args(&args).unwrap(),
            Command::New { ref form, ref attachment } if form == "f.toml" && attachment == "a.png"
        ));
        assert!(parse_args(&["list".to_string()]).is_err());
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.PNG"), "image/png");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a.txt"), "text/plain");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
