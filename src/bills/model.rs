//! 経費精算（bill）のデータモデル。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// バックエンドが返す状態コード。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillStatus {
    /// 承認待ち。
    Pending,
    /// 承認済み。
    Accepted,
    /// 却下。
    Refused,
    /// 未知のコード（そのまま素通しする）。
    Other(String),
}

impl BillStatus {
    /// バックエンド上のコード文字列。
    pub fn code(&self) -> &str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
            BillStatus::Other(code) => code,
        }
    }

    /// 画面表示用のラベル（フランス語固定）。
    pub fn label(&self) -> &str {
        match self {
            BillStatus::Pending => "En attente",
            BillStatus::Accepted => "Accepté",
            BillStatus::Refused => "Refusé",
            BillStatus::Other(code) => code,
        }
    }
}

impl From<String> for BillStatus {
    fn from(code: String) -> Self {
        match code.as_str() {
            "pending" => BillStatus::Pending,
            "accepted" => BillStatus::Accepted,
            "refused" => BillStatus::Refused,
            _ => BillStatus::Other(code),
        }
    }
}

impl From<&str> for BillStatus {
    fn from(code: &str) -> Self {
        BillStatus::from(code.to_string())
    }
}

impl From<BillStatus> for String {
    fn from(status: BillStatus) -> Self {
        status.code().to_string()
    }
}

/// 保存されたままの bill レコード。
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBill {
    /// バックエンド側のID（無い場合もある）。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// ISO形式の日付（"2021-04-01"）。不正な値もあり得る。
    #[serde(default)]
    pub date: String,
    /// 状態コード（"pending" など）。
    #[serde(default)]
    pub status: String,
    /// 金額・種別・添付など、その他の項目。変換せずに引き継ぐ。
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawBill {
    /// 日付と状態だけを持つレコードを作る。
    pub fn new(date: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            status: status.into(),
            ..Self::default()
        }
    }

    /// JSON 1件を型どおりにデコードする。
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// 型が合わないレコードでも値を失わずに取り込む。
    ///
    /// 文字列以外の id/date/status は JSON 表記の文字列に、null は空にする。
    pub fn lossy(value: Value) -> Self {
        // オブジェクト以外は "value" 項目として保持する。
        let mut fields = match value {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".into(), other);
                map
            }
        };
        let id = fields.remove("id").and_then(|v| match v {
            Value::Null => None,
            v => Some(value_text(&v)),
        });
        let date = fields.remove("date").map(|v| value_text(&v)).unwrap_or_default();
        let status = fields
            .remove("status")
            .map(|v| value_text(&v))
            .unwrap_or_default();
        Self {
            id,
            date,
            status,
            fields,
        }
    }
}

/// 文字列はそのまま、null は空、その他は JSON 表記にする。
fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 表示用に変換済みの bill。保存はしない。
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DisplayBill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// "1 Avr. 21" 形式、または解析できなかった元の文字列。
    pub date: String,
    /// 翻訳済みの状態ラベル。
    pub status: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DisplayBill {
    /// 日付と状態だけを持つ表示レコードを作る。
    pub fn new(date: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            status: status.into(),
            ..Self::default()
        }
    }

    /// 文字列項目を取り出す（"name" など）。
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// 新規 bill フォームの入力値（すべて文字列のまま）。
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewBillForm {
    /// 経費種別（"Transport" など）。
    #[serde(rename = "type")]
    pub expense_type: String,
    /// 経費名。
    pub name: String,
    /// 金額（数値として解釈する）。
    pub amount: String,
    /// 日付（"YYYY-MM-DD"）。
    pub date: String,
    /// VAT（文字列のまま送る）。
    pub vat: String,
    /// 割合（数値として解釈する）。
    pub pct: String,
    /// コメント（任意）。
    #[serde(default)]
    pub commentary: String,
}

/// 送信時にバックエンドへ渡す bill 本体。
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPayload {
    pub email: String,
    #[serde(rename = "type")]
    pub expense_type: String,
    pub name: String,
    /// 解析できない入力は NaN のまま（JSONでは null）。
    pub amount: f64,
    pub date: String,
    pub vat: String,
    pub pct: f64,
    pub commentary: String,
    pub file_url: String,
    pub file_name: String,
    /// 新規作成時は常に pending。
    pub status: BillStatus,
}

/// 文字列先頭の整数部分を数値化する。数字が無ければ NaN。
pub fn parse_leading_int(input: &str) -> f64 {
    let s = input.trim_start();
    // 符号を読み取る。
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    // 連続する数字だけを取り出す。
    let digits: &str = match rest.find(|c: char| !c.is_ascii_digit()) {
        Some(end) => &rest[..end],
        None => rest,
    };
    if digits.is_empty() {
        return f64::NAN;
    }
    let value = digits.parse::<f64>().unwrap_or(f64::NAN);
    if negative { -value } else { value }
}
