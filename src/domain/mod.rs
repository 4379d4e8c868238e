// 領域層：問卷代碼、預測請求、外部服務的介面

pub mod codes;
pub mod model;
pub mod ports;
pub mod request;
