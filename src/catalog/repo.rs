use crate::catalog::dto::{Bakery, Product};

/// Read-only catalog collaborator. The credential/OTP core does not depend
/// on it; it only backs the two listing endpoints the mobile app reads.
pub struct CatalogStore {
    bakeries: Vec<Bakery>,
    products: Vec<Product>,
}

fn bakery(id: i64, name: &str, location: &str, image: &str) -> Bakery {
    Bakery {
        id,
        name: name.into(),
        location: location.into(),
        image: image.into(),
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: i64,
    title: &str,
    subtitle: &str,
    price: i64,
    image: &str,
    description: &str,
    bakery_id: i64,
) -> Product {
    Product {
        id,
        title: title.into(),
        subtitle: subtitle.into(),
        price,
        image: image.into(),
        description: description.into(),
        bakery_id,
    }
}

impl CatalogStore {
    /// Default catalog the mobile app ships with.
    pub fn seeded() -> Self {
        let bakeries = vec![
            bakery(1, "مخبز رويال", "بيت بوس", "assets/images/1.jpg"),
            bakery(2, "مخبز الشفاء", "شارع تعز", "assets/images/2.jpg"),
            bakery(3, "مخبز النور", "حدة", "assets/images/1.jpg"),
            bakery(4, "مخبز الواحة", "شارع الستين", "assets/images/2.jpg"),
            bakery(5, "مخبز اليمن السعيد", "شارع 24", "assets/images/1.jpg"),
        ];
        let products = vec![
            product(
                101,
                "كيكة الشوكولاتة",
                "كيكة غنية بالكريمة",
                15,
                "assets/images/7.png",
                "كيكة شوكولاتة فاخرة مع طبقات من الكريمة الغنية. مثالية للمناسبات الخاصة.",
                1,
            ),
            product(
                102,
                "خبز يمني",
                "خبز طازج ومقرمش",
                2,
                "assets/images/8.png",
                "خبز يمني تقليدي مخبوز على الطريقة القديمة.",
                1,
            ),
            product(
                201,
                "معجنات الجبنة",
                "عجينة ذهبية محشوة بالجبنة",
                10,
                "assets/images/7.png",
                "معجنات هشة ومحشوة بأجود أنواع الجبن، مثالية للفطور أو العشاء.",
                2,
            ),
            product(
                202,
                "بقلاوة بالفستق",
                "حلويات شرقية تقليدية",
                20,
                "assets/images/8.png",
                "بقلاوة فاخرة مصنوعة من الفستق الحلبي الطازج.",
                2,
            ),
            product(
                203,
                "كرواسون شوكولاتة",
                "كرواسون فرنسي محشو",
                5,
                "assets/images/1.jpg",
                "كرواسون طازج ومقرمش محشو بالشوكولاتة.",
                2,
            ),
            product(
                301,
                "كيكة الفواكه",
                "منعشة ولذيذة",
                18,
                "assets/images/7.png",
                "كيكة خفيفة مزينة بالفواكه الطازجة.",
                3,
            ),
            product(
                401,
                "كعك العسل",
                "مذاق العسل الطبيعي",
                8,
                "assets/images/8.png",
                "كعك محلى بالعسل الطبيعي، مثالي مع الشاي.",
                4,
            ),
            product(
                501,
                "خبز الخميرة البلدية",
                "خبز صحي ولذيذ",
                3,
                "assets/images/7.png",
                "خبز مصنوع من الخميرة البلدية الطبيعية.",
                5,
            ),
            product(
                502,
                "كنافة نابلسية",
                "بالجبنة والعسل",
                25,
                "assets/images/8.png",
                "كنافة على الطريقة النابلسية التقليدية.",
                5,
            ),
        ];
        Self { bakeries, products }
    }

    pub fn list_bakeries(&self) -> &[Bakery] {
        &self.bakeries
    }

    pub fn list_products(&self, bakery_id: i64) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.bakery_id == bakery_id)
            .cloned()
            .collect()
    }
}
