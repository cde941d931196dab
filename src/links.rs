/// One of the invitation options on the options screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InviteOption {
    Limited,
    Unlimited,
    Community,
}

/// Side an option box enters the screen from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDirection {
    Top,
    Left,
    Right,
}

impl InviteOption {
    /// In entrance order
    pub const ALL: [InviteOption; 3] = [
        InviteOption::Limited,
        InviteOption::Unlimited,
        InviteOption::Community,
    ];

    /// Options are numbered 1..=3 on screen
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Limited),
            2 => Some(Self::Unlimited),
            3 => Some(Self::Community),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Self::Limited => 1,
            Self::Unlimited => 2,
            Self::Community => 3,
        }
    }

    pub fn slide_direction(self) -> SlideDirection {
        match self {
            Self::Limited => SlideDirection::Top,
            Self::Unlimited => SlideDirection::Left,
            Self::Community => SlideDirection::Right,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Link {
    pub url: &'static str,
    pub label: &'static str,
}

static LIMITED: Link = Link {
    url: "https://chat.whatsapp.com/IJHIPCKfT0IBWxKKtYIXbU",
    label: "Join SHADOW LIMITED 6V6",
};

static UNLIMITED: Link = Link {
    url: "https://chat.whatsapp.com/CGK2VtyLg0J7a31Xg779dz",
    label: "Join SHADOW UNLIMITED 6V6",
};

static COMMUNITY: Link = Link {
    url: "https://chat.whatsapp.com/HmNU66a5yafJnnZ54pvZ7O",
    label: "Community",
};

/// Static destination table for the invitation options
pub struct LinkRegistry;

impl LinkRegistry {
    pub fn resolve(option: InviteOption) -> &'static Link {
        match option {
            InviteOption::Limited => &LIMITED,
            InviteOption::Unlimited => &UNLIMITED,
            InviteOption::Community => &COMMUNITY,
        }
    }
}
