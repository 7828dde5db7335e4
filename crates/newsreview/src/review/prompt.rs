use common::api::open_ai::{ChatCompletionsRequest, Message, ResponseFormat, ResponseFormatType};
use common::consts::REVIEW_MODEL_NAME;

pub const REVIEW_TEMPERATURE: f64 = 0.3;
pub const REVIEW_MAX_TOKENS: u32 = 2000;

/// Lead-in placed before the article in the user message, followed by a blank line.
pub const USER_PROMPT_LEAD_IN: &str = "请评审以下新闻稿：";

/// Evaluation instruction sent as the system message. It fixes the five
/// scoring dimensions and the exact JSON shape the model must answer with.
pub const SYSTEM_PROMPT: &str = r#"你是一位资深的新闻编辑审稿专家，拥有20年央视新闻审稿经验。请对用户提交的新闻稿进行专业评审。

你必须严格按照以下JSON格式返回结果，不要返回任何其他内容：

{
  "objectivity": {
    "score": 0-100的整数,
    "comment": "一句话评语，不超过30字"
  },
  "density": {
    "score": 0-100的整数,
    "comment": "一句话评语，不超过30字"
  },
  "readability": {
    "score": 0-100的整数,
    "comment": "一句话评语，不超过30字"
  },
  "headline": {
    "score": 0-100的整数,
    "comment": "一句话评语，不超过30字"
  },
  "structure": {
    "score": 0-100的整数,
    "comment": "一句话评语，不超过30字"
  },
  "suggestions": [
    "具体改进建议1",
    "具体改进建议2",
    "具体改进建议3"
  ]
}

评分维度说明：
- objectivity（客观性）：是否客观中立，有无主观臆断或偏颇表述
- density（信息密度）：单位篇幅内有效信息量，是否有冗余废话
- readability（可读性）：语言是否流畅，逻辑是否清晰，受众是否易理解
- headline（标题吸引力）：标题是否准确概括内容，是否有吸引力但不标题党
- structure（结构完整度）：导语、主体、结尾是否完整，段落衔接是否自然

请根据新闻专业标准严格评分，不要给出虚高分数。一般新闻稿的分数应在60-85之间，只有非常优秀的稿件才能获得85+。

注意：只返回JSON，不要有任何额外的文字说明、markdown标记或代码块标记。"#;

/// Builds the upstream chat completion request for an already validated article.
pub fn build_review_request(article: &str) -> ChatCompletionsRequest {
    ChatCompletionsRequest {
        model: REVIEW_MODEL_NAME.to_string(),
        messages: vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(format!("{}\n\n{}", USER_PROMPT_LEAD_IN, article)),
        ],
        temperature: Some(REVIEW_TEMPERATURE),
        max_tokens: Some(REVIEW_MAX_TOKENS),
        response_format: Some(ResponseFormat {
            format_type: ResponseFormatType::JsonObject,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::api::open_ai::Role;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_review_request() {
        let request = build_review_request("The council approved the budget on Monday.");

        assert_eq!(request.model, "deepseek-ai/DeepSeek-V3");
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.max_tokens, Some(2000));
        assert_eq!(
            request.response_format.as_ref().map(|f| f.format_type),
            Some(ResponseFormatType::JsonObject)
        );

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(
            request.messages[1].content,
            "请评审以下新闻稿：\n\nThe council approved the budget on Monday."
        );
    }

    #[test]
    fn test_system_prompt_names_every_dimension() {
        for key in ["objectivity", "density", "readability", "headline", "structure", "suggestions"] {
            assert!(SYSTEM_PROMPT.contains(&format!("\"{}\"", key)), "{}", key);
        }
    }
}
