use crate::models;
use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::collections::VecDeque;

// 定义一个全局的队列, 外部消费者从这里拿运行中的快照
lazy_static! {
    pub static ref RESULTS_QUEUE: Mutex<VecDeque<models::result::AggregateStats>> =
        Mutex::new(VecDeque::new());
}
