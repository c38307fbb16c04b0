pub mod configuration;

pub mod instrument {
    pub mod cashflowerror;
    pub mod notionalprovider;

    pub mod payment {
        pub mod couponcharacters;
        pub mod fixingresolution;
        pub mod paymentfixed;
        pub mod couponfixed;
        pub mod couponfixedcompounding;
        pub mod couponibor;
        pub mod couponiboraverage;
        pub mod couponovernight;
        pub mod paymentdefinition;
    }

    pub mod derivative {
        pub mod paymentderivative;
    }

    pub mod annuity {
        pub mod annuitydefinition;
        pub mod annuityderivative;
    }

    pub mod leg {
        pub mod couponstub;
        pub mod legconfiguration;
        pub mod legdates;
        pub mod fixedlegbuilder;
        pub mod floatinglegbuilder;
        pub mod legconvention;
        pub mod annuityfactory;
    }
}

pub mod interestrate {
    pub mod compounding;
    pub mod index {
        pub mod interestrateindex;
        pub mod termrateindex;
        pub mod overnightrateindex;
        pub mod fixingseries;
        pub mod interestrateindexmanager;
    }
}

pub mod manager {
    pub mod namedobject;
    pub mod managererror;
    pub mod manager;
}

pub mod market {
    pub mod currency;
}

pub mod time {
    pub mod utility;
    pub mod period;
    pub mod timecalculator;
    pub mod businessdayadjuster;
    pub mod rolldateadjuster;

    pub mod calendar {
        pub mod holidaycalendar;
        pub mod simplecalendar;
        pub mod jointcalendar;
        pub mod holidaycalendarmanager;
    }

    pub mod schedule {
        pub mod scheduleerror;
        pub mod scheduleperiod;
        pub mod generationdirection;
        pub mod calculationperiodgenerator;
        pub mod relativedategenerator;
        pub mod schedule;
        pub mod stubadjuster;
    }

    pub mod daycounter {
        pub mod daycounter;
        pub mod accrualfraction;
        pub mod constdaycounterdominator;
        pub mod isdaactualdaycounterdominator;
        pub mod icmaactualdaycountdominator;
        pub mod standarddaycounters;
        pub mod daycountergeneratormanager;
        pub mod numerator {
            pub mod actualnumerator;
            pub mod businessdaynumerator;
            pub mod noleapnumerator;
            pub mod onenumerator;
            pub mod thirtynumerator;
        }
    }
}
