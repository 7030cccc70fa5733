//! Static support resources per mood

use super::Mood;
use serde::{Deserialize, Serialize};

/// A single support link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceEntry {
    pub title: &'static str,
    pub url: &'static str,
}

const fn entry(title: &'static str, url: &'static str) -> ResourceEntry {
    ResourceEntry { title, url }
}

const SAD: &[ResourceEntry] = &[
    entry(
        "988 Suicide & Crisis Lifeline",
        "https://988lifeline.org",
    ),
    entry(
        "Understanding depression (NIMH)",
        "https://www.nimh.nih.gov/health/topics/depression",
    ),
    entry(
        "Self-care tips for low mood (Mind)",
        "https://www.mind.org.uk/information-support/tips-for-everyday-living/",
    ),
];

const ANXIOUS: &[ResourceEntry] = &[
    entry(
        "Box breathing exercise",
        "https://www.healthline.com/health/box-breathing",
    ),
    entry(
        "Anxiety and Depression Association of America",
        "https://adaa.org/tips",
    ),
    entry(
        "Grounding with the 5-4-3-2-1 technique",
        "https://www.urmc.rochester.edu/behavioral-health-partners/bhp-blog/april-2018/5-4-3-2-1-coping-technique-for-anxiety",
    ),
];

const STRESSED: &[ResourceEntry] = &[
    entry(
        "Coping with stress (CDC)",
        "https://www.cdc.gov/mental-health/living-with/index.html",
    ),
    entry(
        "Guided progressive muscle relaxation",
        "https://www.hopkinsmedicine.org/health/wellness-and-prevention/progressive-muscle-relaxation",
    ),
    entry(
        "Stress management techniques (Mayo Clinic)",
        "https://www.mayoclinic.org/healthy-lifestyle/stress-management/basics/stress-basics/hlv-20049495",
    ),
    entry(
        "Ten-minute mindfulness meditation",
        "https://www.headspace.com/meditation/10-minute-meditation",
    ),
];

const HAPPY: &[ResourceEntry] = &[
    entry(
        "Keeping a gratitude journal",
        "https://greatergood.berkeley.edu/article/item/tips_for_keeping_a_gratitude_journal",
    ),
    entry(
        "Savoring good moments",
        "https://greatergood.berkeley.edu/topic/happiness",
    ),
];

const ANGRY: &[ResourceEntry] = &[
    entry(
        "Controlling anger before it controls you (APA)",
        "https://www.apa.org/topics/anger/control",
    ),
    entry(
        "Anger management tips (Mayo Clinic)",
        "https://www.mayoclinic.org/healthy-lifestyle/adult-health/in-depth/anger-management/art-20045434",
    ),
];

const TIRED: &[ResourceEntry] = &[
    entry(
        "Sleep hygiene basics (Sleep Foundation)",
        "https://www.sleepfoundation.org/sleep-hygiene",
    ),
    entry(
        "Recognizing burnout",
        "https://www.helpguide.org/mental-health/stress/burnout-prevention-and-recovery",
    ),
    entry(
        "Yoga nidra for rest",
        "https://www.youtube.com/results?search_query=yoga+nidra",
    ),
];

const NEUTRAL: &[ResourceEntry] = &[
    entry(
        "Daily mental wellness habits (NAMI)",
        "https://www.nami.org/your-journey/individuals-with-mental-illness/taking-care-of-your-body/",
    ),
    entry(
        "Mindfulness for beginners",
        "https://www.mindful.org/meditation/mindfulness-getting-started/",
    ),
    entry(
        "Find a therapist (Psychology Today)",
        "https://www.psychologytoday.com/us/therapists",
    ),
];

/// Full resource list for `mood`. Moods without a dedicated list use the
/// neutral one.
pub fn resources_for(mood: Mood) -> &'static [ResourceEntry] {
    match mood {
        Mood::Sad => SAD,
        Mood::Anxious => ANXIOUS,
        Mood::Stressed => STRESSED,
        Mood::Happy => HAPPY,
        Mood::Angry => ANGRY,
        Mood::Tired => TIRED,
        Mood::Calm | Mood::Hopeful | Mood::Neutral => NEUTRAL,
    }
}

/// First `n` entries of the full list for `mood`
pub fn top_n(mood: Mood, n: usize) -> &'static [ResourceEntry] {
    let all = resources_for(mood);
    &all[..n.min(all.len())]
}

/// How much of a resource list a client shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceView {
    #[default]
    Collapsed,
    Expanded,
}

impl ResourceView {
    /// Entries visible in this view; `preview` is the collapsed size
    pub fn visible(self, mood: Mood, preview: usize) -> &'static [ResourceEntry] {
        match self {
            ResourceView::Collapsed => top_n(mood, preview),
            ResourceView::Expanded => resources_for(mood),
        }
    }
}
