// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 抓取请求数据传输对象
///
/// 封装客户端发起的人员档案抓取请求的检索参数
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ScrapeRequestDto {
    /// 名
    #[validate(length(min = 1, message = "first_name cannot be empty"))]
    pub first_name: String,
    /// 姓
    #[validate(length(min = 1, message = "last_name cannot be empty"))]
    pub last_name: String,
    /// 城市
    #[validate(length(min = 1, message = "city cannot be empty"))]
    pub city: String,
}
