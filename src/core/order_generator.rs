use time::{Date, Month, PrimitiveDateTime};

use crate::core::clock::Clock;
use crate::models::order::{Author, Order};

// 每个虚拟用户在全局索引里的跨度, 保证各用户的索引段互不重叠
pub const VU_INDEX_SPAN: u64 = 100_000;

// 按虚拟用户编号和迭代序号生成一单, 同一(编号, 序号)生成的数据可复现
pub fn generate_order(vu_id: u64, iteration: u64, clock: &dyn Clock) -> Order {
    let index = vu_id * VU_INDEX_SPAN + iteration;
    // 日期只取1到30号, 8月天数够用
    let day = (index % 30) + 1;
    let date = Date::from_calendar_date(2025, Month::August, day as u8)
        .expect("8月1到30号必然是合法日期");
    Order {
        title: format!("Title {}-{}-{}", vu_id, iteration, clock.now_millis()),
        description: "Some description ".to_string(),
        date: format_date_time(date.midnight()),
        author: Author {
            name: format!("John {}", index),
            surname: format!("Doe {}", index),
        },
    }
}

// DD.MM.YYYY HH:MM:SS, 各段补零
pub(crate) fn format_date_time(dt: PrimitiveDateTime) -> String {
    format!(
        "{:02}.{:02}.{:04} {:02}:{:02}:{:02}",
        dt.day(),
        u8::from(dt.month()),
        dt.year(),
        dt.hour(),
        dt.minute(),
        dt.second()
    )
}
