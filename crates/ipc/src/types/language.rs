//! UI languages and their string tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::IpcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "en")]
    En,
    #[serde(rename = "ja")]
    Ja,
}

impl Language {
    /// Order of the language menu
    pub const ALL: [Language; 4] = [Language::ZhCn, Language::ZhTw, Language::En, Language::Ja];

    /// BCP 47 tag
    pub fn code(self) -> &'static str {
        match self {
            Language::ZhCn => "zh-CN",
            Language::ZhTw => "zh-TW",
            Language::En => "en",
            Language::Ja => "ja",
        }
    }

    pub fn translation(self) -> &'static Translation {
        match self {
            Language::ZhCn => &ZH_CN,
            Language::ZhTw => &ZH_TW,
            Language::En => &EN,
            Language::Ja => &JA,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = IpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| IpcError::UnknownLanguage(s.to_string()))
    }
}

/// User-visible strings for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    /// Name of the language in itself, for the language menu
    pub native_name: &'static str,
    pub title: &'static str,
    pub boards: &'static str,
    pub add_board: &'static str,
    pub clear: &'static str,
    pub eraser: &'static str,
    pub pro_modal_title: &'static str,
    pub pro_modal_desc: &'static str,
    pub pro_action: &'static str,
    pub close: &'static str,
    pub ai_analyze: &'static str,
    pub ai_analyzing: &'static str,
    /// Prompt sent along with the board snapshot
    pub ai_prompt: &'static str,
}

static ZH_CN: Translation = Translation {
    native_name: "简体中文",
    title: "粉笔黑板",
    boards: "黑板",
    add_board: "新建黑板",
    clear: "清空",
    eraser: "板擦",
    pro_modal_title: "升级专业版",
    pro_modal_desc: "免费版最多可使用 4 块黑板。升级后可无限添加黑板。",
    pro_action: "立即升级",
    close: "关闭",
    ai_analyze: "AI 老师",
    ai_analyzing: "思考中...",
    ai_prompt: "请看看黑板上的内容。如果是题目，请给出解答；如果是图画，请简单点评并给予鼓励。",
};

static ZH_TW: Translation = Translation {
    native_name: "繁體中文",
    title: "粉筆黑板",
    boards: "黑板",
    add_board: "新增黑板",
    clear: "清除",
    eraser: "板擦",
    pro_modal_title: "升級專業版",
    pro_modal_desc: "免費版最多可使用 4 塊黑板。升級後可無限新增黑板。",
    pro_action: "立即升級",
    close: "關閉",
    ai_analyze: "AI 老師",
    ai_analyzing: "思考中...",
    ai_prompt: "請看看黑板上的內容。如果是題目，請給出解答；如果是圖畫，請簡單點評並給予鼓勵。",
};

static EN: Translation = Translation {
    native_name: "English",
    title: "Chalkboard",
    boards: "Boards",
    add_board: "New board",
    clear: "Clear",
    eraser: "Eraser",
    pro_modal_title: "Upgrade to Pro",
    pro_modal_desc: "The free version includes up to 4 boards. Upgrade for unlimited boards.",
    pro_action: "Upgrade now",
    close: "Close",
    ai_analyze: "AI Teacher",
    ai_analyzing: "Thinking...",
    ai_prompt: "Take a look at the chalkboard. If it is a problem, solve it; \
        if it is a drawing, give a short, encouraging comment.",
};

static JA: Translation = Translation {
    native_name: "日本語",
    title: "チョーク黒板",
    boards: "黒板",
    add_board: "黒板を追加",
    clear: "消去",
    eraser: "黒板消し",
    pro_modal_title: "プロ版にアップグレード",
    pro_modal_desc: "無料版では黒板を 4 枚まで使えます。アップグレードすると無制限に追加できます。",
    pro_action: "今すぐアップグレード",
    close: "閉じる",
    ai_analyze: "AI 先生",
    ai_analyzing: "考え中...",
    ai_prompt: "黒板の内容を見てください。\
        問題なら解答を、絵なら短く励ましのコメントをお願いします。",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_language() {
        assert_eq!(Language::default(), Language::ZhCn);
    }

    #[test]
    fn test_serde_codes() {
        for lang in Language::ALL {
            let json = serde_json::to_string(&lang).unwrap();
            assert_eq!(json, format!("\"{}\"", lang.code()));
            assert_eq!(serde_json::from_str::<Language>(&json).unwrap(), lang);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("zh-tw".parse::<Language>().unwrap(), Language::ZhTw);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_every_language_has_a_prompt() {
        for lang in Language::ALL {
            let t = lang.translation();
            assert!(!t.ai_prompt.is_empty());
            assert!(!t.native_name.is_empty());
        }
        assert_ne!(Language::En.translation(), Language::Ja.translation());
    }
}
