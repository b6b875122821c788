use serde::{Deserialize, Serialize};

// 状态码断言的两种形态: 必须命中/必须避开
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StatusExpectation {
    Is(u16),
    IsNot(u16),
}

// 按名字统计通过/失败次数的单请求检查
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCheck {
    pub name: String,
    pub expectation: StatusExpectation,
}

impl StatusCheck {
    pub fn new(name: &str, expectation: StatusExpectation) -> Self {
        StatusCheck {
            name: name.to_string(),
            expectation,
        }
    }

    pub fn passes(&self, status_code: u16) -> bool {
        match self.expectation {
            StatusExpectation::Is(code) => status_code == code,
            StatusExpectation::IsNot(code) => status_code != code,
        }
    }
}

// 默认的六个检查, 只对列出的错误码判负, 不推断更严格的白名单
pub fn default_checks() -> Vec<StatusCheck> {
    vec![
        StatusCheck::new("200 OK", StatusExpectation::Is(200)),
        StatusCheck::new("[NETWORK ERROR]", StatusExpectation::IsNot(0)),
        StatusCheck::new("401 Unauthorized", StatusExpectation::IsNot(401)),
        StatusCheck::new("502 Bad Gateway", StatusExpectation::IsNot(502)),
        StatusCheck::new("503 Service Unavailable", StatusExpectation::IsNot(503)),
        StatusCheck::new("504 Gateway Timeout", StatusExpectation::IsNot(504)),
    ]
}
