// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::person::{Cohabitant, CompanyEngagement, Person, Vehicle};
use crate::domain::repositories::person_repository::PersonRepository;
use crate::domain::repositories::task_repository::RepositoryError;
use crate::infrastructure::database::entities::{
    cohabitant as cohabitant_entity, company_engagement as company_entity,
    person as person_entity, vehicle as vehicle_entity,
};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// 档案仓库实现
///
/// 基于SeaORM实现的人员档案数据访问层，
/// 档案与子记录在同一事务内写入。
#[derive(Clone)]
pub struct PersonRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl PersonRepositoryImpl {
    /// 创建新的档案仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 装配档案聚合，子记录按页面顺序加载
    async fn load_aggregate(
        &self,
        model: person_entity::Model,
    ) -> Result<Person, RepositoryError> {
        let cohabitants = cohabitant_entity::Entity::find()
            .filter(cohabitant_entity::Column::PersonId.eq(model.id))
            .order_by_asc(cohabitant_entity::Column::Position)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        let vehicles = vehicle_entity::Entity::find()
            .filter(vehicle_entity::Column::PersonId.eq(model.id))
            .order_by_asc(vehicle_entity::Column::Position)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        let companies = company_entity::Entity::find()
            .filter(company_entity::Column::PersonId.eq(model.id))
            .order_by_asc(company_entity::Column::Position)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(Person {
            id: model.id,
            full_name: model.full_name,
            age: model.age,
            city: model.city,
            address: model.address,
            phone_number: model.phone_number,
            birthday: model.birthday,
            national_id: model.national_id,
            marital_status: model.marital_status,
            created_at: model.created_at,
            cohabitants,
            vehicles,
            companies,
        })
    }
}

impl From<Person> for person_entity::ActiveModel {
    fn from(person: Person) -> Self {
        Self {
            id: Set(person.id),
            full_name: Set(person.full_name.clone()),
            age: Set(person.age.clone()),
            city: Set(person.city.clone()),
            address: Set(person.address.clone()),
            phone_number: Set(person.phone_number.clone()),
            birthday: Set(person.birthday.clone()),
            national_id: Set(person.national_id.clone()),
            marital_status: Set(person.marital_status.clone()),
            created_at: Set(person.created_at),
        }
    }
}

impl From<cohabitant_entity::Model> for Cohabitant {
    fn from(model: cohabitant_entity::Model) -> Self {
        Self {
            id: model.id,
            person_id: model.person_id,
            name: model.name,
            age: model.age,
            position: model.position,
        }
    }
}

impl From<Cohabitant> for cohabitant_entity::ActiveModel {
    fn from(cohabitant: Cohabitant) -> Self {
        Self {
            id: Set(cohabitant.id),
            person_id: Set(cohabitant.person_id),
            name: Set(cohabitant.name.clone()),
            age: Set(cohabitant.age.clone()),
            position: Set(cohabitant.position),
        }
    }
}

impl From<vehicle_entity::Model> for Vehicle {
    fn from(model: vehicle_entity::Model) -> Self {
        Self {
            id: model.id,
            person_id: model.person_id,
            make_model: model.make_model,
            model_year: model.model_year,
            owner: model.owner,
            registration: model.registration,
            position: model.position,
        }
    }
}

impl From<Vehicle> for vehicle_entity::ActiveModel {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: Set(vehicle.id),
            person_id: Set(vehicle.person_id),
            make_model: Set(vehicle.make_model.clone()),
            model_year: Set(vehicle.model_year.clone()),
            owner: Set(vehicle.owner.clone()),
            registration: Set(vehicle.registration.clone()),
            position: Set(vehicle.position),
        }
    }
}

impl From<company_entity::Model> for CompanyEngagement {
    fn from(model: company_entity::Model) -> Self {
        Self {
            id: model.id,
            person_id: model.person_id,
            company_name: model.company_name,
            position_title: model.position_title,
            company_url: model.company_url,
            position: model.position,
        }
    }
}

impl From<CompanyEngagement> for company_entity::ActiveModel {
    fn from(engagement: CompanyEngagement) -> Self {
        Self {
            id: Set(engagement.id),
            person_id: Set(engagement.person_id),
            company_name: Set(engagement.company_name.clone()),
            position_title: Set(engagement.position_title.clone()),
            company_url: Set(engagement.company_url.clone()),
            position: Set(engagement.position),
        }
    }
}

#[async_trait]
impl PersonRepository for PersonRepositoryImpl {
    async fn find_by_full_name(
        &self,
        full_name: &str,
    ) -> Result<Option<Person>, RepositoryError> {
        let model = person_entity::Entity::find()
            .filter(person_entity::Column::FullName.eq(full_name))
            .one(self.db.as_ref())
            .await?;

        match model {
            Some(m) => Ok(Some(self.load_aggregate(m).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Person>, RepositoryError> {
        let model = person_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        match model {
            Some(m) => Ok(Some(self.load_aggregate(m).await?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, person: &Person) -> Result<Person, RepositoryError> {
        let txn = self.db.begin().await?;

        let model: person_entity::ActiveModel = person.clone().into();
        if let Err(e) = model.insert(&txn).await {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                return Err(RepositoryError::Conflict(person.full_name.clone()));
            }
            return Err(e.into());
        }

        if !person.cohabitants.is_empty() {
            let rows: Vec<cohabitant_entity::ActiveModel> =
                person.cohabitants.iter().cloned().map(Into::into).collect();
            cohabitant_entity::Entity::insert_many(rows).exec(&txn).await?;
        }
        if !person.vehicles.is_empty() {
            let rows: Vec<vehicle_entity::ActiveModel> =
                person.vehicles.iter().cloned().map(Into::into).collect();
            vehicle_entity::Entity::insert_many(rows).exec(&txn).await?;
        }
        if !person.companies.is_empty() {
            let rows: Vec<company_entity::ActiveModel> =
                person.companies.iter().cloned().map(Into::into).collect();
            company_entity::Entity::insert_many(rows).exec(&txn).await?;
        }

        txn.commit().await?;
        Ok(person.clone())
    }
}
