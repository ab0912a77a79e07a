// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 档案抽取候选
///
/// 从单个档案页抽取出的未落库数据。每个字段独立抽取，
/// 任何字段缺失都不影响其他字段。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileCandidate {
    /// 全名，档案的唯一身份标识
    pub full_name: Option<String>,
    /// 年龄
    pub age: Option<String>,
    /// 城市
    pub city: Option<String>,
    /// 地址
    pub address: Option<String>,
    /// 电话号码
    pub phone_number: Option<String>,
    /// 生日描述
    pub birthday: Option<String>,
    /// 身份号码
    pub national_id: Option<String>,
    /// 婚姻状况
    pub marital_status: Option<String>,
    /// 同住人列表，按页面出现顺序
    pub cohabitants: Vec<CohabitantCandidate>,
    /// 名下车辆列表，按页面出现顺序
    pub vehicles: Vec<VehicleCandidate>,
    /// 公司任职列表，按页面出现顺序
    pub companies: Vec<CompanyCandidate>,
}

/// 同住人候选条目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohabitantCandidate {
    /// 姓名，页面缺失时为"N/A"
    pub name: String,
    /// 年龄描述
    pub age: Option<String>,
}

/// 车辆候选条目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleCandidate {
    /// 品牌与型号
    pub make_model: String,
    /// 年款
    pub model_year: Option<String>,
    /// 所有人
    pub owner: Option<String>,
    /// 牌照号
    pub registration: Option<String>,
}

/// 公司任职候选条目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyCandidate {
    /// 公司名称
    pub company_name: String,
    /// 职位名称
    pub position_title: Option<String>,
    /// 公司页面URL
    pub company_url: Option<String>,
}

/// 人员档案聚合
///
/// 表示一条已落库的人员档案及其全部子记录。
/// 全名在系统内唯一，作为档案收敛的自然键。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// 档案唯一标识符
    pub id: Uuid,
    /// 全名，唯一
    pub full_name: String,
    /// 年龄
    pub age: Option<String>,
    /// 城市
    pub city: Option<String>,
    /// 地址
    pub address: Option<String>,
    /// 电话号码
    pub phone_number: Option<String>,
    /// 生日描述
    pub birthday: Option<String>,
    /// 身份号码
    pub national_id: Option<String>,
    /// 婚姻状况
    pub marital_status: Option<String>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 同住人记录
    pub cohabitants: Vec<Cohabitant>,
    /// 车辆记录
    pub vehicles: Vec<Vehicle>,
    /// 公司任职记录
    pub companies: Vec<CompanyEngagement>,
}

/// 同住人记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cohabitant {
    /// 记录唯一标识符
    pub id: Uuid,
    /// 所属档案ID
    pub person_id: Uuid,
    /// 姓名
    pub name: String,
    /// 年龄描述
    pub age: Option<String>,
    /// 页面内顺序，从0开始
    pub position: i32,
}

/// 车辆记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// 记录唯一标识符
    pub id: Uuid,
    /// 所属档案ID
    pub person_id: Uuid,
    /// 品牌与型号
    pub make_model: String,
    /// 年款
    pub model_year: Option<String>,
    /// 所有人
    pub owner: Option<String>,
    /// 牌照号
    pub registration: Option<String>,
    /// 页面内顺序，从0开始
    pub position: i32,
}

/// 公司任职记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyEngagement {
    /// 记录唯一标识符
    pub id: Uuid,
    /// 所属档案ID
    pub person_id: Uuid,
    /// 公司名称
    pub company_name: String,
    /// 职位名称
    pub position_title: Option<String>,
    /// 公司页面URL
    pub company_url: Option<String>,
    /// 页面内顺序，从0开始
    pub position: i32,
}

impl Person {
    /// 由抽取候选构建档案聚合
    ///
    /// 生成全新的档案ID与子记录ID，子记录顺序取自候选顺序。
    ///
    /// # 参数
    ///
    /// * `candidate` - 档案抽取候选
    ///
    /// # 返回值
    ///
    /// * `Some(Person)` - 候选携带非空全名时构建成功
    /// * `None` - 候选缺少全名，无法确定档案身份
    pub fn from_candidate(candidate: &ProfileCandidate) -> Option<Self> {
        let full_name = candidate.full_name.as_deref()?.trim();
        if full_name.is_empty() {
            return None;
        }

        let id = Uuid::new_v4();
        let cohabitants = candidate
            .cohabitants
            .iter()
            .enumerate()
            .map(|(i, c)| Cohabitant {
                id: Uuid::new_v4(),
                person_id: id,
                name: c.name.clone(),
                age: c.age.clone(),
                position: i as i32,
            })
            .collect();
        let vehicles = candidate
            .vehicles
            .iter()
            .enumerate()
            .map(|(i, v)| Vehicle {
                id: Uuid::new_v4(),
                person_id: id,
                make_model: v.make_model.clone(),
                model_year: v.model_year.clone(),
                owner: v.owner.clone(),
                registration: v.registration.clone(),
                position: i as i32,
            })
            .collect();
        let companies = candidate
            .companies
            .iter()
            .enumerate()
            .map(|(i, c)| CompanyEngagement {
                id: Uuid::new_v4(),
                person_id: id,
                company_name: c.company_name.clone(),
                position_title: c.position_title.clone(),
                company_url: c.company_url.clone(),
                position: i as i32,
            })
            .collect();

        Some(Self {
            id,
            full_name: full_name.to_string(),
            age: candidate.age.clone(),
            city: candidate.city.clone(),
            address: candidate.address.clone(),
            phone_number: candidate.phone_number.clone(),
            birthday: candidate.birthday.clone(),
            national_id: candidate.national_id.clone(),
            marital_status: candidate.marital_status.clone(),
            created_at: Utc::now().into(),
            cohabitants,
            vehicles,
            companies,
        })
    }
}
