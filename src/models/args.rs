use clap_derive::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// 目标地址
    #[arg(short, long)]
    pub(crate) url: String,

    /// basic认证用户名
    #[arg(long)]
    pub(crate) username: String,

    /// basic认证密码
    #[arg(long)]
    pub(crate) password: String,

    /// 阶梯, 形如30s:50, 按顺序可多次传入, 不传用内置五段曲线
    #[arg(short, long)]
    pub(crate) stage: Vec<String>,

    /// 阈值, 形如p95<500或rate<0.01, 可多次传入
    #[arg(short, long)]
    pub(crate) threshold: Vec<String>,

    /// 超时时间（秒）
    #[arg(long, default_value_t = 0)]
    pub(crate) timeout: u64,

    /// 调度器步进间隔（毫秒）
    #[arg(long, default_value_t = 1000)]
    pub(crate) tick_interval_ms: u64,

    /// 每个虚拟用户两次迭代之间的间隔（毫秒）
    #[arg(long, default_value_t = 0)]
    pub(crate) pacing_ms: u64,

    /// 打印详情
    #[arg(short, long, default_value_t = false)]
    pub(crate) verbose: bool,
}
