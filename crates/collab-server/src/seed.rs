//! Demo marketplace for local runs: one seller per listing kind and region,
//! all sharing the password `demo1234`.

use anyhow::Result;
use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use collab_db::Store;
use collab_types::models::{Listing, ListingKind, Profile, User};

pub const DEMO_PASSWORD: &str = "demo1234";

struct DemoSeller {
    email: &'static str,
    display_name: &'static str,
    brand_name: &'static str,
    region: &'static str,
    about: &'static str,
    marketplaces: &'static [&'static str],
    categories: &'static [&'static str],
    biz_type: &'static str,
    sales_monthly_rub: f64,
    legal_name: &'static str,
    inn: &'static str,
    phone: &'static str,
    kind: ListingKind,
    title: &'static str,
    description: &'static str,
    tags: &'static [&'static str],
}

const SELLERS: &[DemoSeller] = &[
    DemoSeller {
        email: "collab1@collab.local",
        display_name: "Анна Смирнова",
        brand_name: "AnnStyle",
        region: "Москва",
        about: "Производим женскую одежду, ищем партнёра для совместной капсулы.",
        marketplaces: &["wildberries"],
        categories: &["одежда", "мода"],
        biz_type: "ИП",
        sales_monthly_rub: 450_000.0,
        legal_name: "ИП Смирнова А.В.",
        inn: "770111222333",
        phone: "+79991000001",
        kind: ListingKind::Collab,
        title: "Коллаборация: капсула одежды + аксессуары",
        description: "Ищем партнёра с аксессуарами или упаковкой для совместной капсульной коллекции. WB приоритет.",
        tags: &["коллаборация", "капсула"],
    },
    DemoSeller {
        email: "collab2@collab.local",
        display_name: "Максим Орлов",
        brand_name: "OrlovHome",
        region: "Санкт-Петербург",
        about: "Товары для дома и декор. Хотим запустить совместный набор с текстильщиками.",
        marketplaces: &["wildberries", "ozon"],
        categories: &["дом", "декор"],
        biz_type: "ООО",
        sales_monthly_rub: 820_000.0,
        legal_name: "ООО \"Орлов Хоум\"",
        inn: "7812001002",
        phone: "+79991000002",
        kind: ListingKind::Collab,
        title: "Совместный набор для дома",
        description: "Органайзеры + текстиль + подарочная упаковка. Ищем текстильного партнёра.",
        tags: &["набор", "дом"],
    },
    DemoSeller {
        email: "service1@collab.local",
        display_name: "Игорь Петров",
        brand_name: "LogiPro",
        region: "Казань",
        about: "Фулфилмент и логистика для WB и Ozon. Приёмка, хранение, упаковка, отгрузка.",
        marketplaces: &["wildberries", "ozon"],
        categories: &["логистика", "фулфилмент"],
        biz_type: "ООО",
        sales_monthly_rub: 0.0,
        legal_name: "ООО \"ЛогиПро\"",
        inn: "1655001002",
        phone: "+79992000001",
        kind: ListingKind::Service,
        title: "Фулфилмент и логистика для WB и Ozon",
        description: "Приёмка, хранение, упаковка, отгрузка на склады маркетплейсов. Договор, отчётность, личный менеджер.",
        tags: &["фулфилмент", "услуги"],
    },
    DemoSeller {
        email: "service2@collab.local",
        display_name: "Ольга Фролова",
        brand_name: "DesignLab",
        region: "Москва",
        about: "Дизайн карточек товаров и инфографики для маркетплейсов.",
        marketplaces: &["wildberries", "ozon", "yandex"],
        categories: &["дизайн", "маркетинг"],
        biz_type: "Самозанятый",
        sales_monthly_rub: 0.0,
        legal_name: "Фролова О.М.",
        inn: "770888999000",
        phone: "+79992000002",
        kind: ListingKind::Service,
        title: "Дизайн карточек и инфографика для маркетплейсов",
        description: "Создаём продающие карточки товаров: инфографика, рич-контент, обложки.",
        tags: &["дизайн", "инфографика"],
    },
    DemoSeller {
        email: "supplier1@collab.local",
        display_name: "Тимур Ахметов",
        brand_name: "TextilOpt",
        region: "Иваново",
        about: "Оптовые поставки текстиля: ткани, постельное бельё, полотенца. Производство РФ.",
        marketplaces: &["wildberries", "ozon"],
        categories: &["текстиль", "дом"],
        biz_type: "ООО",
        sales_monthly_rub: 2_400_000.0,
        legal_name: "ООО \"ТекстильОпт\"",
        inn: "3702010203",
        phone: "+79993000001",
        kind: ListingKind::Supplier,
        title: "Оптовые поставки текстиля, производство РФ",
        description: "Постельное бельё, полотенца, кухонный текстиль. Сертификаты, собственное производство в Иваново.",
        tags: &["поставщик", "текстиль"],
    },
    DemoSeller {
        email: "supplier2@collab.local",
        display_name: "Наталья Громова",
        brand_name: "CosmRaw",
        region: "Москва",
        about: "Сырьё и ингредиенты для косметических производств. Сертифицированные поставки.",
        marketplaces: &["ozon"],
        categories: &["косметика", "сырьё"],
        biz_type: "ООО",
        sales_monthly_rub: 3_200_000.0,
        legal_name: "ООО \"КосмРо\"",
        inn: "7701234567",
        phone: "+79993000004",
        kind: ListingKind::Supplier,
        title: "Сертифицированное сырьё для косметики",
        description: "Масла, экстракты, эмульгаторы. Вся документация.",
        tags: &["сырьё", "косметика"],
    },
];

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Populate an empty store. Returns the number of users created.
pub fn seed_if_empty(store: &Store) -> Result<usize> {
    if store.with_doc(|doc| !doc.users.is_empty())? {
        return Ok(0);
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(DEMO_PASSWORD.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hashing demo password: {}", e))?
        .to_string();

    let now = Utc::now();
    let created = store.with_doc_mut(|doc| {
        // another writer may have registered in the meantime
        if !doc.users.is_empty() {
            return Ok::<_, anyhow::Error>(0);
        }
        for s in SELLERS {
            let user_id = Uuid::new_v4();
            doc.users.push(User {
                id: user_id,
                email: s.email.to_string(),
                password_hash: password_hash.clone(),
                created_at: now,
            });
            doc.profiles.push(Profile {
                user_id,
                display_name: Some(s.display_name.into()),
                brand_name: Some(s.brand_name.into()),
                marketplaces: strings(s.marketplaces),
                categories: strings(s.categories),
                region: Some(s.region.into()),
                about: Some(s.about.into()),
                biz_type: Some(s.biz_type.into()),
                sales_monthly_rub: Some(s.sales_monthly_rub),
                logo_path: None,
                legal_name: Some(s.legal_name.into()),
                inn: Some(s.inn.into()),
                phone: Some(s.phone.into()),
                contact_email: Some(s.email.into()),
                contact_telegram: None,
                updated_at: Some(now),
            });
            doc.listings.push(Listing {
                id: Uuid::new_v4(),
                owner_user_id: user_id,
                kind: s.kind,
                title: s.title.into(),
                description: s.description.into(),
                region: Some(s.region.into()),
                marketplaces: strings(s.marketplaces),
                categories: strings(s.categories),
                tags: strings(s.tags),
                published: true,
                created_at: now,
                updated_at: now,
            });
        }
        Ok(SELLERS.len())
    })?;

    if created > 0 {
        info!("Seeded {} demo sellers (password {})", created, DEMO_PASSWORD);
    }
    Ok(created)
}
