//! 商品图标 - 业务能力层
//!
//! 回答按行展示，提到常见商品的行前面加上对应分类的图标

use phf::phf_ordered_map;
use regex::Regex;
use std::sync::OnceLock;

/// 图标分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroceryIcon {
    ShoppingBasket,
    LocalGroceryStore,
    Restaurant,
    LocalCafe,
    LocalDrink,
    BakeryDining,
    LocalPizza,
    Icecream,
    Spa,
    LocalLaundryService,
    CleaningServices,
    LocalMall,
}

impl GroceryIcon {
    /// 图标名称（与前端图标库一致）
    pub fn name(&self) -> &'static str {
        match self {
            GroceryIcon::ShoppingBasket => "ShoppingBasket",
            GroceryIcon::LocalGroceryStore => "LocalGroceryStore",
            GroceryIcon::Restaurant => "Restaurant",
            GroceryIcon::LocalCafe => "LocalCafe",
            GroceryIcon::LocalDrink => "LocalDrink",
            GroceryIcon::BakeryDining => "BakeryDining",
            GroceryIcon::LocalPizza => "LocalPizza",
            GroceryIcon::Icecream => "Icecream",
            GroceryIcon::Spa => "Spa",
            GroceryIcon::LocalLaundryService => "LocalLaundryService",
            GroceryIcon::CleaningServices => "CleaningServices",
            GroceryIcon::LocalMall => "LocalMall",
        }
    }
}

/// 未匹配时使用的图标
pub const DEFAULT_ICON: GroceryIcon = GroceryIcon::ShoppingBasket;

/// 关键词 → 图标，按声明顺序匹配
pub static GROCERY_ICONS: phf::OrderedMap<&'static str, GroceryIcon> = phf_ordered_map! {
    // 蔬果
    "apple" => GroceryIcon::Spa,
    "banana" => GroceryIcon::Spa,
    "orange" => GroceryIcon::Spa,
    "tomato" => GroceryIcon::Spa,
    "potato" => GroceryIcon::Spa,
    "onion" => GroceryIcon::Spa,
    "carrot" => GroceryIcon::Spa,
    "lettuce" => GroceryIcon::Spa,
    "cucumber" => GroceryIcon::Spa,
    "broccoli" => GroceryIcon::Spa,
    // 乳制品
    "milk" => GroceryIcon::LocalGroceryStore,
    "cheese" => GroceryIcon::LocalGroceryStore,
    "yogurt" => GroceryIcon::LocalGroceryStore,
    "butter" => GroceryIcon::LocalGroceryStore,
    "cream" => GroceryIcon::LocalGroceryStore,
    // 肉类海鲜
    "chicken" => GroceryIcon::Restaurant,
    "beef" => GroceryIcon::Restaurant,
    "fish" => GroceryIcon::Restaurant,
    "pork" => GroceryIcon::Restaurant,
    "lamb" => GroceryIcon::Restaurant,
    // 烘焙
    "bread" => GroceryIcon::BakeryDining,
    "cake" => GroceryIcon::BakeryDining,
    "cookies" => GroceryIcon::BakeryDining,
    "pastry" => GroceryIcon::BakeryDining,
    // 饮品
    "coffee" => GroceryIcon::LocalCafe,
    "tea" => GroceryIcon::LocalCafe,
    "juice" => GroceryIcon::LocalDrink,
    "soda" => GroceryIcon::LocalDrink,
    "water" => GroceryIcon::LocalDrink,
    // 零食
    "chips" => GroceryIcon::LocalPizza,
    "candy" => GroceryIcon::Icecream,
    "chocolate" => GroceryIcon::Icecream,
    "nuts" => GroceryIcon::LocalPizza,
    // 日用品
    "detergent" => GroceryIcon::LocalLaundryService,
    "soap" => GroceryIcon::CleaningServices,
    "paper" => GroceryIcon::LocalMall,
    "cleaning" => GroceryIcon::CleaningServices,
};

/// 查找商品对应的图标
///
/// 按表的顺序取第一个被商品名包含的关键词，例如 "Pineapple" 命中 "apple"
pub fn icon_for(item: &str) -> GroceryIcon {
    let item = item.to_lowercase();
    GROCERY_ICONS
        .entries()
        .find(|(key, _)| item.contains(*key))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

/// 回答中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerLine {
    pub text: String,
    /// 行内提到商品时的图标
    pub icon: Option<GroceryIcon>,
}

fn grocery_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            let words: Vec<&str> = GROCERY_ICONS.keys().copied().collect();
            Regex::new(&format!(r"(?i)\b({})\b", words.join("|"))).ok()
        })
        .as_ref()
}

/// 把回答拆成行，并为提到商品的行标注图标
pub fn annotate_answer(answer: &str) -> Vec<AnswerLine> {
    let pattern = grocery_pattern();

    answer
        .split('\n')
        .map(|line| {
            let icon = pattern
                .and_then(|re| re.captures(line))
                .and_then(|caps| caps.get(1))
                .map(|m| icon_for(m.as_str()));
            AnswerLine {
                text: line.to_string(),
                icon,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_for_uses_substring_in_table_order() {
        assert_eq!(icon_for("Whole Milk 1L"), GroceryIcon::LocalGroceryStore);
        assert_eq!(icon_for("Pineapple"), GroceryIcon::Spa);
        assert_eq!(icon_for("Dish soap"), GroceryIcon::CleaningServices);
        assert_eq!(icon_for("Batteries"), GroceryIcon::ShoppingBasket);
        // 子串匹配: "steak" 包含 "tea"
        assert_eq!(icon_for("steak"), GroceryIcon::LocalCafe);
    }

    #[test]
    fn test_annotate_answer_matches_whole_words() {
        let lines = annotate_answer("You bought:\n2x Bread - $3.00\nTeapot - $20\nMILK and eggs");

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].icon, None);
        assert_eq!(lines[1].icon, Some(GroceryIcon::BakeryDining));
        // "Teapot" 不是完整单词 "tea"
        assert_eq!(lines[2].icon, None);
        assert_eq!(lines[3].icon, Some(GroceryIcon::LocalGroceryStore));
        assert_eq!(lines[3].text, "MILK and eggs");
    }

    #[test]
    fn test_icon_names() {
        assert_eq!(GroceryIcon::Spa.name(), "Spa");
        assert_eq!(DEFAULT_ICON.name(), "ShoppingBasket");
    }
}
