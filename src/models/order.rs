use serde::{Deserialize, Serialize};

// 每次迭代生成一个订单载荷, 发送一次后即丢弃
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub title: String,
    pub description: String,
    pub date: String,
    pub author: Author,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub surname: String,
}
