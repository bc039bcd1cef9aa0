/// Substrings of the client identity string that mark a mobile browser.
const MOBILE_MARKERS: [&str; 5] = ["mobi", "android", "iphone", "ipad", "ipod"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformClass {
    Mobile,
    Desktop,
}

impl PlatformClass {
    pub fn from_user_agent(user_agent: &str) -> Self {
        let user_agent = user_agent.to_ascii_lowercase();
        if MOBILE_MARKERS
            .iter()
            .any(|marker| user_agent.contains(marker))
        {
            PlatformClass::Mobile
        } else {
            PlatformClass::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == PlatformClass::Mobile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_common_mobile_agents() {
        let agents = [
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148",
            "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/124.0 Mobile Safari/537.36",
            "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15",
            "Mozilla/5.0 (iPod touch; CPU iPhone OS 15_0 like Mac OS X)",
            "Opera/9.80 (J2ME/MIDP; Opera Mini/9.80; U; en) Presto/2.12.423 MOBI",
        ];
        for agent in agents {
            assert_eq!(PlatformClass::from_user_agent(agent), PlatformClass::Mobile, "{agent}");
        }
    }

    #[test]
    fn desktop_agents_are_not_mobile() {
        let agents = [
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/124.0 Safari/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 Version/17.4 Safari/605.1.15",
            "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
            "",
        ];
        for agent in agents {
            assert!(!PlatformClass::from_user_agent(agent).is_mobile(), "{agent}");
        }
    }
}
