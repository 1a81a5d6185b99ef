//! Static reference tables behind [`KnowledgeBase::standard`](crate::KnowledgeBase::standard).

use crate::branch::Branch;
use crate::stem::Stem;

/// Hidden stems per branch (index = branch index), main qi first, weights sum to 8.
#[rustfmt::skip]
pub(crate) static HIDDEN_STEMS: [&[(Stem, u8)]; 12] = [
    /* 子 */ &[(Stem::Gui, 8)],
    /* 丑 */ &[(Stem::Ji, 5), (Stem::Gui, 2), (Stem::Xin, 1)],
    /* 寅 */ &[(Stem::Jia, 5), (Stem::Bing, 2), (Stem::Wu, 1)],
    /* 卯 */ &[(Stem::Yi, 8)],
    /* 辰 */ &[(Stem::Wu, 5), (Stem::Yi, 2), (Stem::Gui, 1)],
    /* 巳 */ &[(Stem::Bing, 5), (Stem::Wu, 2), (Stem::Geng, 1)],
    /* 午 */ &[(Stem::Ding, 5), (Stem::Ji, 3)],
    /* 未 */ &[(Stem::Ji, 5), (Stem::Ding, 2), (Stem::Yi, 1)],
    /* 申 */ &[(Stem::Geng, 5), (Stem::Ren, 2), (Stem::Wu, 1)],
    /* 酉 */ &[(Stem::Xin, 8)],
    /* 戌 */ &[(Stem::Wu, 5), (Stem::Xin, 2), (Stem::Ding, 1)],
    /* 亥 */ &[(Stem::Ren, 5), (Stem::Jia, 3)],
];

/// Long-life (长生) branch per stem. Yang stems advance, yin stems retreat.
pub(crate) static LONG_LIFE: [Branch; 10] = [
    Branch::Hai,  // 甲
    Branch::Wu,   // 乙
    Branch::Yin,  // 丙
    Branch::You,  // 丁
    Branch::Yin,  // 戊
    Branch::You,  // 己
    Branch::Si,   // 庚
    Branch::Zi,   // 辛
    Branch::Shen, // 壬
    Branch::Mao,  // 癸
];

/// Five stem combinations.
pub(crate) static STEM_COMBINATIONS: [(Stem, Stem); 5] = [
    (Stem::Jia, Stem::Ji),
    (Stem::Yi, Stem::Geng),
    (Stem::Bing, Stem::Xin),
    (Stem::Ding, Stem::Ren),
    (Stem::Wu, Stem::Gui),
];

/// Nayin names, one per consecutive pair of the 60 cycle (甲子乙丑 = 海中金).
#[rustfmt::skip]
pub(crate) static NAYIN: [&str; 30] = [
    "海中金", "炉中火", "大林木", "路旁土", "剑锋金", "山头火",
    "涧下水", "城头土", "白蜡金", "杨柳木", "泉中水", "屋上土",
    "霹雳火", "松柏木", "长流水", "砂中金", "山下火", "平地木",
    "壁上土", "金箔金", "覆灯火", "天河水", "大驿土", "钗钏金",
    "桑柘木", "大溪水", "沙中土", "天上火", "石榴木", "大海水",
];

/// Raw code → public label.
#[rustfmt::skip]
pub(crate) static DISPLAY_NAMES: &[(&str, &str)] = &[
    ("比", "比肩"), ("劫", "劫財"), ("食", "食神"), ("伤", "傷官"), ("才", "偏財"),
    ("财", "正財"), ("杀", "七殺"), ("官", "正官"), ("枭", "偏印"), ("印", "正印"),
    ("长", "長生"), ("沐", "沐浴"), ("冠", "冠帶"), ("建", "臨官"), ("帝", "帝旺"),
    ("库", "墓"), ("绝", "絕"), ("养", "養"),
    ("炉中火", "爐中火"), ("剑锋金", "劍鋒金"), ("山头火", "山頭火"), ("涧下水", "澗下水"),
    ("城头土", "城頭土"), ("白蜡金", "白蠟金"), ("杨柳木", "楊柳木"), ("霹雳火", "霹靂火"),
    ("长流水", "長流水"), ("砂中金", "沙中金"), ("覆灯火", "覆燈火"), ("大驿土", "大驛土"),
    ("钗钏金", "釵釧金"),
];

/// Punishment chains: (punisher, punished).
#[rustfmt::skip]
pub(crate) static PUNISHMENTS: [(Branch, Branch); 12] = [
    (Branch::Yin, Branch::Si), (Branch::Si, Branch::Shen), (Branch::Shen, Branch::Yin),
    (Branch::Chou, Branch::Xu), (Branch::Xu, Branch::Wei), (Branch::Wei, Branch::Chou),
    (Branch::Zi, Branch::Mao), (Branch::Mao, Branch::Zi),
    (Branch::Chen, Branch::Chen), (Branch::Wu, Branch::Wu),
    (Branch::You, Branch::You), (Branch::Hai, Branch::Hai),
];

/// Seasonal meetings.
pub(crate) static MEETINGS: [[Branch; 3]; 4] = [
    [Branch::Hai, Branch::Zi, Branch::Chou],
    [Branch::Yin, Branch::Mao, Branch::Chen],
    [Branch::Si, Branch::Wu, Branch::Wei],
    [Branch::Shen, Branch::You, Branch::Xu],
];

#[rustfmt::skip]
pub(crate) static HARMS: [(Branch, Branch); 6] = [
    (Branch::Zi, Branch::Wei), (Branch::Chou, Branch::Wu), (Branch::Yin, Branch::Si),
    (Branch::Mao, Branch::Chen), (Branch::Shen, Branch::Hai), (Branch::You, Branch::Xu),
];

#[rustfmt::skip]
pub(crate) static BREAKS: [(Branch, Branch); 6] = [
    (Branch::Zi, Branch::You), (Branch::Chou, Branch::Chen), (Branch::Yin, Branch::Hai),
    (Branch::Mao, Branch::Wu), (Branch::Si, Branch::Shen), (Branch::Wei, Branch::Xu),
];

#[rustfmt::skip]
pub(crate) static SIX_HARMONIES: [(Branch, Branch); 6] = [
    (Branch::Zi, Branch::Chou), (Branch::Yin, Branch::Hai), (Branch::Mao, Branch::Xu),
    (Branch::Chen, Branch::You), (Branch::Si, Branch::Shen), (Branch::Wu, Branch::Wei),
];

#[rustfmt::skip]
pub(crate) static HIDDEN_COMBINATIONS: [(Branch, Branch); 3] = [
    (Branch::Yin, Branch::Chou), (Branch::Mao, Branch::Shen), (Branch::Wu, Branch::Hai),
];

/// Arched (拱) branch for two members of a three-harmony triad missing their center.
#[rustfmt::skip]
pub(crate) static ARCHES: [(Branch, Branch, Branch); 4] = [
    (Branch::Shen, Branch::Chen, Branch::Zi),
    (Branch::Si, Branch::Chou, Branch::You),
    (Branch::Yin, Branch::Xu, Branch::Wu),
    (Branch::Hai, Branch::Wei, Branch::Mao),
];
